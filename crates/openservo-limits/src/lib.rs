//! RT-Safe Joint-Limit Enforcement for openservo
//!
//! This crate clamps a desired joint command, every control cycle, into the
//! joint's physical envelope (hard limits on position, velocity,
//! acceleration, jerk and effort) and its soft envelope (a virtual cushion
//! that decelerates the joint before it reaches the hard bounds).
//!
//! # Overview
//!
//! - [`solver`]: pure per-quantity bound computations
//! - [`soft`]: the soft-cushion enforcement backend
//! - [`saturation`]: the hard-limit-only enforcement backend
//! - [`limiter`]: the multi-joint frontend with the init/configure/enforce
//!   lifecycle and wait-free limit updates
//! - [`params`]: the parameter-source capability and per-joint key schema
//!
//! # RT Safety Guarantees
//!
//! The enforce path is designed for control loops running at hundreds to
//! thousands of Hz:
//! - No heap allocations (one string copy on the very first cycle aside)
//! - No logging, no I/O, no syscalls
//! - One short uncontended mutex around the previous-command state
//! - Limit updates arrive through a wait-free handoff; the enforce thread
//!   never waits on the parameter thread
//!
//! # Example
//!
//! ```
//! use openservo_limits::prelude::*;
//!
//! # fn main() -> Result<(), openservo_limits::LimiterError> {
//! let limits = JointLimits {
//!     position: Some(PositionRange::new(-1.0, 1.0)),
//!     max_velocity: Some(2.0),
//!     ..Default::default()
//! };
//! let mut limiter =
//!     SoftJointLimiter::from_limits(vec!["elbow".into()], vec![limits], vec![])?;
//!
//! // In the control loop:
//! let actual = JointControlSample::new("elbow").with_position(0.9);
//! let mut desired = JointControlSample::new("elbow").with_position(5.0);
//! let clipped = limiter.enforce(&actual, &mut desired, 0.001);
//! assert!(clipped);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod constants;
pub mod error;
pub mod limiter;
pub mod params;
pub mod prelude;
pub mod saturation;
pub mod soft;
pub mod solver;

mod tracking;

pub use constants::{POSITION_BOUNDS_TOLERANCE, SOFT_LIMIT_RECOVERY_RATE};
pub use error::{LimiterError, LimiterResult};
pub use limiter::{
    JointLimiter, JointSaturationLimiter, LimitEnforcer, LimitsView, SoftJointLimiter,
};
pub use params::{
    check_for_limits_update, MapParameterSource, Parameter, ParameterChangeCallback,
    ParameterSource, ParameterValue,
};
pub use saturation::SaturationEnforcer;
pub use soft::SoftEnforcer;
pub use solver::{
    compute_acceleration_limits, compute_effort_limits, compute_position_limits,
    compute_velocity_limits, LimitBounds,
};
