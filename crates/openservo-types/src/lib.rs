//! Joint limit and command-sample data model for openservo
//!
//! This crate provides the value types shared by the joint-limit enforcement
//! stack: the hard limit envelope of a joint, the optional soft (cushion)
//! envelope, and the per-cycle command/measurement sample.
//!
//! # Overview
//!
//! - [`JointLimits`]: hard bounds on position, velocity, acceleration,
//!   deceleration, jerk and effort. Every quantity is optional; an absent
//!   limit means the quantity is unconstrained.
//! - [`SoftJointLimits`]: a virtual cushion inside the hard envelope that
//!   converts position overshoot into a velocity bound (`k_position`) and
//!   velocity overshoot into an effort bound (`k_velocity`).
//! - [`JointControlSample`]: one joint's command or measurement, with an
//!   independent presence flag per quantity.
//!
//! # RT Safety
//!
//! All types are plain data. [`JointControlSample`] owns its joint name, so
//! cloning one allocates; the enforcement hot path mutates samples in place
//! and never clones them.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod error;
pub mod limits;
pub mod sample;

pub use error::LimitsError;
pub use limits::{JointLimits, PositionRange, SoftJointLimits};
pub use sample::JointControlSample;
