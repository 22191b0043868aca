//! Convenience re-exports for embedders.

pub use crate::constants::{POSITION_BOUNDS_TOLERANCE, SOFT_LIMIT_RECOVERY_RATE};
pub use crate::error::{LimiterError, LimiterResult};
pub use crate::limiter::{
    JointLimiter, JointSaturationLimiter, LimitEnforcer, LimitsView, SoftJointLimiter,
};
pub use crate::params::{
    check_for_limits_update, MapParameterSource, Parameter, ParameterChangeCallback,
    ParameterSource, ParameterValue,
};
pub use crate::saturation::SaturationEnforcer;
pub use crate::soft::SoftEnforcer;
pub use crate::solver::{
    compute_acceleration_limits, compute_effort_limits, compute_position_limits,
    compute_velocity_limits, LimitBounds,
};

pub use openservo_types::{
    JointControlSample, JointLimits, LimitsError, PositionRange, SoftJointLimits,
};
