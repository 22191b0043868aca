//! Enforcement constants.

/// Slack applied to the hard position bounds when deciding whether the
/// measured position has left the envelope. Absorbs state-feedback jitter so
/// a joint resting exactly on a bound is not treated as escaped.
pub const POSITION_BOUNDS_TOLERANCE: f64 = 1e-3;

/// Velocity commanded while the joint sits outside the soft envelope but
/// inside the hard one: 1 deg/s, signed to pull the joint back inside.
pub const SOFT_LIMIT_RECOVERY_RATE: f64 = std::f64::consts::PI / 180.0;
