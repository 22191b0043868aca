//! Joint limit envelopes.
//!
//! [`JointLimits`] is the hard, physically inviolable envelope of a joint.
//! [`SoftJointLimits`] is an optional virtual cushion inside it that the
//! enforcement core uses to decelerate a joint before it ever touches the
//! hard bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LimitsError;

/// Inclusive position interval of a joint, in radians (or meters for
/// prismatic joints).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRange {
    /// Lower position bound
    pub min: f64,
    /// Upper position bound
    pub max: f64,
}

impl PositionRange {
    /// Create a new position interval.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `position` lies inside the interval (inclusive).
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.min && position <= self.max
    }
}

/// Hard limits of a single joint.
///
/// Every quantity is optional: `None` means the quantity is unconstrained
/// and the enforcement core treats it as `±∞`. Active magnitudes must be
/// strictly positive and finite; [`JointLimits::validate`] checks this.
///
/// `max_deceleration` refines `max_acceleration`: when present, the side of
/// an acceleration window that reduces `|velocity|` uses it instead of the
/// symmetric `max_acceleration`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointLimits {
    /// Hard position interval
    pub position: Option<PositionRange>,
    /// Velocity magnitude bound, rad/s
    pub max_velocity: Option<f64>,
    /// Acceleration magnitude bound, rad/s^2
    pub max_acceleration: Option<f64>,
    /// Deceleration magnitude bound, rad/s^2, used on the braking side
    pub max_deceleration: Option<f64>,
    /// Jerk magnitude bound, rad/s^3
    pub max_jerk: Option<f64>,
    /// Effort magnitude bound, Nm
    pub max_effort: Option<f64>,
}

impl JointLimits {
    /// Whether a hard position interval is configured.
    #[inline]
    pub fn has_position_limits(&self) -> bool {
        self.position.is_some()
    }

    /// Whether a velocity bound is configured.
    #[inline]
    pub fn has_velocity_limits(&self) -> bool {
        self.max_velocity.is_some()
    }

    /// Whether an acceleration bound is configured.
    #[inline]
    pub fn has_acceleration_limits(&self) -> bool {
        self.max_acceleration.is_some()
    }

    /// Whether a dedicated deceleration bound is configured.
    #[inline]
    pub fn has_deceleration_limits(&self) -> bool {
        self.max_deceleration.is_some()
    }

    /// Whether a jerk bound is configured.
    #[inline]
    pub fn has_jerk_limits(&self) -> bool {
        self.max_jerk.is_some()
    }

    /// Whether an effort bound is configured.
    #[inline]
    pub fn has_effort_limits(&self) -> bool {
        self.max_effort.is_some()
    }

    /// Check the limit set for internal contradictions.
    ///
    /// Active magnitudes must be strictly positive and finite; the position
    /// interval must be finite and ordered. `joint` only labels the error.
    pub fn validate(&self, joint: &str) -> Result<(), LimitsError> {
        if let Some(range) = self.position {
            for bound in [range.min, range.max] {
                if !bound.is_finite() {
                    return Err(LimitsError::NonFinitePositionBound {
                        joint: joint.into(),
                        value: bound,
                    });
                }
            }
            if range.min > range.max {
                return Err(LimitsError::PositionRangeInverted {
                    joint: joint.into(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
        let magnitudes = [
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
            ("max_deceleration", self.max_deceleration),
            ("max_jerk", self.max_jerk),
            ("max_effort", self.max_effort),
        ];
        for (quantity, value) in magnitudes {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(LimitsError::invalid_magnitude(joint, quantity, value));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for JointLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(range) => write!(f, "position [{}, {}]", range.min, range.max)?,
            None => write!(f, "position unbounded")?,
        }
        let magnitudes = [
            ("velocity", self.max_velocity),
            ("acceleration", self.max_acceleration),
            ("deceleration", self.max_deceleration),
            ("jerk", self.max_jerk),
            ("effort", self.max_effort),
        ];
        for (name, value) in magnitudes {
            match value {
                Some(value) => write!(f, ", {name} +/-{value}")?,
                None => write!(f, ", {name} unbounded")?,
            }
        }
        Ok(())
    }
}

/// Soft (cushion) limits of a single joint.
///
/// The cushion is a narrower position interval inside the hard envelope plus
/// two proportional gains. The default value (all zeros) means "no soft
/// limits": the position range is empty and both gains are absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoftJointLimits {
    /// Lower soft position bound
    pub min_position: f64,
    /// Upper soft position bound
    pub max_position: f64,
    /// Gain converting position overshoot into a velocity bound, 1/s
    pub k_position: f64,
    /// Gain converting velocity overshoot into an effort bound, Nm s/rad
    pub k_velocity: f64,
}

impl SoftJointLimits {
    /// Whether the soft position interval is non-empty (`min < max`, strict).
    #[inline]
    pub fn has_position_range(&self) -> bool {
        self.min_position < self.max_position
    }

    /// Whether the position gain is usable (finite and strictly positive).
    #[inline]
    pub fn has_position_gain(&self) -> bool {
        self.k_position.is_finite() && self.k_position > 0.0
    }

    /// Whether the velocity gain is usable (finite and strictly positive).
    #[inline]
    pub fn has_velocity_gain(&self) -> bool {
        self.k_velocity.is_finite() && self.k_velocity > 0.0
    }

    /// Whether the position cushion is fully configured: a non-empty soft
    /// interval together with a usable position gain.
    #[inline]
    pub fn has_soft_limits(&self) -> bool {
        self.has_position_range() && self.has_position_gain()
    }
}
