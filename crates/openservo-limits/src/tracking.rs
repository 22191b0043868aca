//! Previous-command bookkeeping shared by the enforcement backends.
//!
//! Both backends carry a `prev_command` sample across cycles: it anchors the
//! finite-difference windows and keeps measurement lag out of the envelope.
//! The helpers here seed it on first use, substitute non-finite output, and
//! copy the final command back into it.

use openservo_types::JointControlSample;

/// Seed every quantity `desired` carries that `prev_command` still lacks.
///
/// The measured value wins when present; otherwise the desired value itself
/// becomes the anchor. The joint name is adopted once, from whichever sample
/// has data (the only point on the enforce path that can allocate, first
/// cycle only).
pub(crate) fn seed_prev_command(
    prev_command: &mut JointControlSample,
    actual: &JointControlSample,
    desired: &JointControlSample,
) {
    if desired.position.is_some() && prev_command.position.is_none() {
        prev_command.position = actual.position.or(desired.position);
    }
    if desired.velocity.is_some() && prev_command.velocity.is_none() {
        prev_command.velocity = actual.velocity.or(desired.velocity);
    }
    if desired.effort.is_some() && prev_command.effort.is_none() {
        prev_command.effort = actual.effort.or(desired.effort);
    }
    if desired.acceleration.is_some() && prev_command.acceleration.is_none() {
        prev_command.acceleration = actual.acceleration.or(desired.acceleration);
    }
    if desired.jerk.is_some() && prev_command.jerk.is_none() {
        prev_command.jerk = actual.jerk.or(desired.jerk);
    }
    if prev_command.joint_name.is_empty() {
        if actual.has_data() {
            prev_command.joint_name = actual.joint_name.clone();
        } else if desired.has_data() {
            prev_command.joint_name = desired.joint_name.clone();
        }
    }
}

/// Replace non-finite output quantities.
///
/// Position falls back to the measured position when one exists; the
/// derivative quantities stop the joint instead. Returns whether anything
/// was substituted.
pub(crate) fn sanitize_non_finite(
    desired: &mut JointControlSample,
    actual: &JointControlSample,
) -> bool {
    let mut sanitized = false;
    if let Some(position) = desired.position {
        if !position.is_finite() && actual.position.is_some() {
            desired.position = actual.position;
            sanitized = true;
        }
    }
    if let Some(velocity) = desired.velocity {
        if !velocity.is_finite() {
            desired.velocity = Some(0.0);
            sanitized = true;
        }
    }
    if let Some(acceleration) = desired.acceleration {
        if !acceleration.is_finite() {
            desired.acceleration = Some(0.0);
            sanitized = true;
        }
    }
    if let Some(jerk) = desired.jerk {
        if !jerk.is_finite() {
            desired.jerk = Some(0.0);
            sanitized = true;
        }
    }
    sanitized
}

/// Copy the quantities present in the final command into `prev_command`.
pub(crate) fn update_prev_command(
    prev_command: &mut JointControlSample,
    desired: &JointControlSample,
) {
    if desired.position.is_some() {
        prev_command.position = desired.position;
    }
    if desired.velocity.is_some() {
        prev_command.velocity = desired.velocity;
    }
    if desired.effort.is_some() {
        prev_command.effort = desired.effort;
    }
    if desired.acceleration.is_some() {
        prev_command.acceleration = desired.acceleration;
    }
    if desired.jerk.is_some() {
        prev_command.jerk = desired.jerk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_prefers_actual_over_desired() {
        let mut prev = JointControlSample::default();
        let actual = JointControlSample::new("j1").with_position(0.5);
        let desired = JointControlSample::new("j1").with_position(1.5).with_velocity(2.0);

        seed_prev_command(&mut prev, &actual, &desired);

        assert_eq!(prev.position, Some(0.5));
        // No measured velocity: the desired one seeds the anchor.
        assert_eq!(prev.velocity, Some(2.0));
        assert_eq!(prev.joint_name, "j1");
    }

    #[test]
    fn test_seed_only_fills_missing_quantities() {
        let mut prev = JointControlSample::new("j1").with_position(0.1);
        let actual = JointControlSample::new("j1").with_position(0.9);
        let desired = JointControlSample::new("j1").with_position(1.0);

        seed_prev_command(&mut prev, &actual, &desired);

        assert_eq!(prev.position, Some(0.1));
    }

    #[test]
    fn test_seed_adopts_name_from_desired_when_actual_is_empty() {
        let mut prev = JointControlSample::default();
        let actual = JointControlSample::new("ignored");
        let desired = JointControlSample::new("j2").with_velocity(1.0);

        seed_prev_command(&mut prev, &actual, &desired);

        assert_eq!(prev.joint_name, "j2");
    }

    #[test]
    fn test_sanitize_position_needs_a_measured_fallback() {
        let actual = JointControlSample::new("j1");
        let mut desired = JointControlSample::new("j1").with_position(f64::NAN);
        // Nothing to fall back to: the NaN stays.
        assert!(!sanitize_non_finite(&mut desired, &actual));
        assert!(desired.position.is_some_and(f64::is_nan));

        let actual = JointControlSample::new("j1").with_position(0.25);
        assert!(sanitize_non_finite(&mut desired, &actual));
        assert_eq!(desired.position, Some(0.25));
    }

    #[test]
    fn test_sanitize_zeroes_derivative_quantities() {
        let actual = JointControlSample::new("j1");
        let mut desired = JointControlSample::new("j1")
            .with_velocity(f64::INFINITY)
            .with_acceleration(f64::NAN)
            .with_jerk(f64::NEG_INFINITY);

        assert!(sanitize_non_finite(&mut desired, &actual));
        assert_eq!(desired.velocity, Some(0.0));
        assert_eq!(desired.acceleration, Some(0.0));
        assert_eq!(desired.jerk, Some(0.0));
    }

    #[test]
    fn test_sanitize_leaves_finite_values_alone() {
        let actual = JointControlSample::new("j1").with_position(0.0);
        let mut desired = JointControlSample::new("j1")
            .with_position(0.4)
            .with_velocity(-1.0);
        assert!(!sanitize_non_finite(&mut desired, &actual));
        assert_eq!(desired.position, Some(0.4));
        assert_eq!(desired.velocity, Some(-1.0));
    }

    #[test]
    fn test_update_copies_present_quantities_only() {
        let mut prev = JointControlSample::new("j1")
            .with_position(0.1)
            .with_effort(5.0);
        let desired = JointControlSample::new("j1").with_position(0.2);

        update_prev_command(&mut prev, &desired);

        assert_eq!(prev.position, Some(0.2));
        assert_eq!(prev.effort, Some(5.0));
    }
}
