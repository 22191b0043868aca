//! Hard (saturation) limit enforcement.
//!
//! [`SaturationEnforcer`] clamps each present quantity straight into the
//! solver's interval for it. No cushion, no recovery behavior: the joint may
//! ride a hard bound exactly. Same lifecycle, previous-command tracking and
//! NaN sanitation as the soft backend.

use openservo_types::JointControlSample;
use parking_lot::Mutex;

use crate::error::{LimiterError, LimiterResult};
use crate::limiter::{LimitEnforcer, LimitsView};
use crate::solver::{
    compute_acceleration_limits, compute_effort_limits, compute_position_limits,
    compute_velocity_limits,
};
use crate::tracking::{sanitize_non_finite, seed_prev_command, update_prev_command};

/// Per-joint saturation backend: hard limits only.
#[derive(Debug, Default)]
pub struct SaturationEnforcer {
    prev_command: Mutex<JointControlSample>,
}

impl LimitEnforcer<JointControlSample> for SaturationEnforcer {
    fn on_init(&mut self, number_of_joints: usize) -> LimiterResult<()> {
        if number_of_joints != 1 {
            return Err(LimiterError::UnsupportedJointCount(number_of_joints));
        }
        Ok(())
    }

    fn on_configure(&self, current_state: &JointControlSample) -> bool {
        *self.prev_command.lock() = current_state.clone();
        true
    }

    fn on_enforce(
        &self,
        limits: &LimitsView<'_>,
        actual: &JointControlSample,
        desired: &mut JointControlSample,
        dt_seconds: f64,
    ) -> bool {
        if !(dt_seconds > 0.0) {
            return false;
        }
        let Some(hard) = limits.hard.first() else {
            return false;
        };

        let mut prev = self.prev_command.lock();
        let mut limits_enforced = false;

        seed_prev_command(&mut prev, actual, desired);

        if let Some(desired_pos) = desired.position {
            let bounds =
                compute_position_limits(hard, actual.position, prev.position, dt_seconds);
            limits_enforced |= desired_pos < bounds.lower || desired_pos > bounds.upper;
            desired.position = Some(bounds.clamp(desired_pos));
        }

        if let Some(desired_vel) = desired.velocity {
            let bounds =
                compute_velocity_limits(hard, actual.position, prev.velocity, dt_seconds);
            limits_enforced |= desired_vel < bounds.lower || desired_vel > bounds.upper;
            desired.velocity = Some(bounds.clamp(desired_vel));
        }

        if let Some(desired_eff) = desired.effort {
            let bounds = compute_effort_limits(hard, actual.position, actual.velocity);
            limits_enforced |= desired_eff < bounds.lower || desired_eff > bounds.upper;
            desired.effort = Some(bounds.clamp(desired_eff));
        }

        if let Some(desired_acc) = desired.acceleration {
            let bounds = compute_acceleration_limits(hard, desired_acc, actual.velocity);
            limits_enforced |= desired_acc < bounds.lower || desired_acc > bounds.upper;
            desired.acceleration = Some(bounds.clamp(desired_acc));
        }

        if let (Some(desired_jerk), Some(max_jerk)) = (desired.jerk, hard.max_jerk) {
            limits_enforced |= desired_jerk < -max_jerk || desired_jerk > max_jerk;
            desired.jerk = Some(desired_jerk.clamp(-max_jerk, max_jerk));
        }

        limits_enforced |= sanitize_non_finite(desired, actual);
        update_prev_command(&mut prev, desired);

        limits_enforced
    }

    fn reset_internals(&self) {
        *self.prev_command.lock() = JointControlSample::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openservo_types::{JointLimits, PositionRange};

    const DT: f64 = 0.01;

    fn run(
        hard: JointLimits,
        actual: &JointControlSample,
        desired: &mut JointControlSample,
    ) -> bool {
        let mut enforcer = SaturationEnforcer::default();
        enforcer.on_init(1).expect("single joint");
        let names = vec!["j1".to_string()];
        let hard = vec![hard];
        let view = LimitsView {
            joint_names: &names,
            hard: &hard,
            soft: &[],
        };
        enforcer.on_enforce(&view, actual, desired, DT)
    }

    #[test]
    fn test_position_saturates_at_hard_bound() {
        let hard = JointLimits {
            position: Some(PositionRange::new(-1.0, 1.0)),
            ..Default::default()
        };
        let actual = JointControlSample::new("j1").with_position(0.9);
        let mut desired = JointControlSample::new("j1").with_position(1.5);

        assert!(run(hard, &actual, &mut desired));
        assert_eq!(desired.position, Some(1.0));
    }

    #[test]
    fn test_no_cushion_rides_the_bound_exactly() {
        // Unlike the soft backend there is no recovery pull: a command at the
        // bound itself passes through untouched.
        let hard = JointLimits {
            position: Some(PositionRange::new(-1.0, 1.0)),
            ..Default::default()
        };
        let actual = JointControlSample::new("j1").with_position(1.0);
        let mut desired = JointControlSample::new("j1").with_position(1.0);

        assert!(!run(hard, &actual, &mut desired));
        assert_eq!(desired.position, Some(1.0));
    }

    #[test]
    fn test_velocity_saturates_through_acceleration_window() {
        let hard = JointLimits {
            max_velocity: Some(2.0),
            max_acceleration: Some(10.0),
            ..Default::default()
        };
        let actual = JointControlSample::new("j1").with_velocity(0.0);
        let mut desired = JointControlSample::new("j1").with_velocity(-5.0);

        assert!(run(hard, &actual, &mut desired));
        let vel = desired.velocity.expect("velocity present");
        assert!((vel - -0.1).abs() < 1e-9, "expected -0.1, got {vel}");
    }

    #[test]
    fn test_effort_zeroed_against_the_wall() {
        let hard = JointLimits {
            position: Some(PositionRange::new(-1.0, 1.0)),
            max_effort: Some(50.0),
            ..Default::default()
        };
        let actual = JointControlSample::new("j1")
            .with_position(1.0)
            .with_velocity(0.2);
        let mut desired = JointControlSample::new("j1").with_effort(30.0);

        assert!(run(hard, &actual, &mut desired));
        assert_eq!(desired.effort, Some(0.0));
    }

    #[test]
    fn test_jerk_saturates_symmetrically() {
        let hard = JointLimits {
            max_jerk: Some(100.0),
            ..Default::default()
        };
        let actual = JointControlSample::new("j1");
        let mut desired = JointControlSample::new("j1").with_jerk(-250.0);

        assert!(run(hard, &actual, &mut desired));
        assert_eq!(desired.jerk, Some(-100.0));
    }

    #[test]
    fn test_nan_sanitation_applies() {
        let hard = JointLimits::default();
        let actual = JointControlSample::new("j1").with_position(0.5);
        let mut desired = JointControlSample::new("j1")
            .with_position(f64::NAN)
            .with_acceleration(f64::INFINITY);

        assert!(run(hard, &actual, &mut desired));
        assert_eq!(desired.position, Some(0.5));
        assert_eq!(desired.acceleration, Some(0.0));
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let hard = JointLimits {
            position: Some(PositionRange::new(-1.0, 1.0)),
            ..Default::default()
        };
        let mut enforcer = SaturationEnforcer::default();
        enforcer.on_init(1).expect("single joint");
        let names = vec!["j1".to_string()];
        let hard = vec![hard];
        let view = LimitsView {
            joint_names: &names,
            hard: &hard,
            soft: &[],
        };
        let actual = JointControlSample::new("j1").with_position(0.0);
        let mut desired = JointControlSample::new("j1").with_position(42.0);

        assert!(!enforcer.on_enforce(&view, &actual, &mut desired, -1.0));
        assert_eq!(desired.position, Some(42.0));
    }
}
