//! Property-Based Tests for the Enforcement Core
//!
//! These tests verify the enforcement invariants across a wide range of
//! inputs: envelope containment, rate boundedness, stop-within-bounds,
//! idempotence, the dt guard and output finiteness.

use openservo_limits::prelude::*;

fn hard_limits() -> JointLimits {
    JointLimits {
        position: Some(PositionRange::new(-1.0, 1.0)),
        max_velocity: Some(2.0),
        max_acceleration: Some(10.0),
        max_deceleration: Some(8.0),
        max_jerk: Some(100.0),
        max_effort: Some(50.0),
    }
}

fn soft_limiter(limits: JointLimits) -> SoftJointLimiter {
    SoftJointLimiter::from_limits(vec!["j1".into()], vec![limits], vec![])
        .expect("valid limiter")
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 0.01;
    const EPS: f64 = 1e-9;

    proptest! {
        #[test]
        fn position_output_stays_in_hard_envelope(
            act_pos in -1.0f64..1.0,
            desired_pos in -100.0f64..100.0,
        ) {
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1").with_position(act_pos);
            let mut desired = JointControlSample::new("j1").with_position(desired_pos);

            limiter.enforce(&actual, &mut desired, DT);

            let out = desired.position.expect("position present");
            prop_assert!(out >= -1.0 - EPS && out <= 1.0 + EPS, "out = {}", out);
        }

        #[test]
        fn velocity_output_stays_in_hard_envelope(
            act_pos in -1.0f64..1.0,
            act_vel in -2.0f64..2.0,
            desired_vel in -100.0f64..100.0,
        ) {
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1")
                .with_position(act_pos)
                .with_velocity(act_vel);
            let mut desired = JointControlSample::new("j1").with_velocity(desired_vel);

            limiter.enforce(&actual, &mut desired, DT);

            let out = desired.velocity.expect("velocity present");
            prop_assert!(out.abs() <= 2.0 + EPS, "out = {}", out);
        }

        #[test]
        fn velocity_rate_is_bounded_by_acceleration(
            act_vel in -1.0f64..1.0,
            first_desired in -2.0f64..2.0,
            second_desired in -2.0f64..2.0,
        ) {
            let limits = JointLimits {
                max_velocity: Some(2.0),
                max_acceleration: Some(10.0),
                ..Default::default()
            };
            let mut limiter = soft_limiter(limits);
            let actual = JointControlSample::new("j1").with_velocity(act_vel);

            let mut desired = JointControlSample::new("j1").with_velocity(first_desired);
            limiter.enforce(&actual, &mut desired, DT);
            let first_out = desired.velocity.expect("velocity present");

            let mut desired = JointControlSample::new("j1").with_velocity(second_desired);
            limiter.enforce(&actual, &mut desired, DT);
            let second_out = desired.velocity.expect("velocity present");

            prop_assert!(
                (second_out - first_out).abs() <= 10.0 * DT + EPS,
                "step {} -> {} exceeds the acceleration window",
                first_out,
                second_out
            );
        }

        #[test]
        fn velocity_allows_a_worst_case_stop_inside_bounds(
            act_pos in -0.99f64..0.99,
            prev_frac in -1.0f64..1.0,
            desired_vel in -100.0f64..100.0,
        ) {
            let limits = JointLimits {
                position: Some(PositionRange::new(-1.0, 1.0)),
                max_velocity: Some(50.0),
                max_acceleration: Some(10.0),
                max_deceleration: Some(8.0),
                ..Default::default()
            };
            let mut limiter = soft_limiter(limits);

            // Seed a previous command that itself respected the stopping cap;
            // the invariant only holds once the loop is in that regime.
            let stop_up = (2.0 * 8.0 * (1.0 - act_pos)).sqrt();
            let stop_down = (2.0 * 8.0 * (act_pos + 1.0)).sqrt();
            let prev_vel = if prev_frac >= 0.0 {
                prev_frac * stop_up.min(50.0)
            } else {
                prev_frac * stop_down.min(50.0)
            };
            limiter.configure(&JointControlSample::new("j1").with_velocity(prev_vel));

            let actual = JointControlSample::new("j1").with_position(act_pos);
            let mut desired = JointControlSample::new("j1").with_velocity(desired_vel);

            limiter.enforce(&actual, &mut desired, DT);

            let out = desired.velocity.expect("velocity present");
            let distance = if out >= 0.0 { 1.0 - act_pos } else { act_pos - -1.0 };
            prop_assert!(
                0.5 * out * out / 8.0 <= distance + EPS,
                "velocity {} cannot stop within {}",
                out,
                distance
            );
        }

        #[test]
        fn enforce_is_idempotent_inside_the_envelope(
            act_pos in -0.9f64..0.9,
            act_vel in -1.0f64..1.0,
            desired_pos in -10.0f64..10.0,
            desired_vel in -10.0f64..10.0,
            desired_eff in -100.0f64..100.0,
        ) {
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1")
                .with_position(act_pos)
                .with_velocity(act_vel);
            let mut desired = JointControlSample::new("j1")
                .with_position(desired_pos)
                .with_velocity(desired_vel)
                .with_effort(desired_eff);

            limiter.enforce(&actual, &mut desired, DT);
            let first_pass = desired.clone();

            let second = limiter.enforce(&actual, &mut desired, DT);
            prop_assert!(!second, "second pass must be a no-op");
            prop_assert_eq!(desired, first_pass);
        }

        #[test]
        fn return_flag_matches_mutation(
            act_pos in -1.0f64..1.0,
            act_vel in -2.0f64..2.0,
            desired_pos in -3.0f64..3.0,
            desired_vel in -6.0f64..6.0,
        ) {
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1")
                .with_position(act_pos)
                .with_velocity(act_vel);
            let mut desired = JointControlSample::new("j1")
                .with_position(desired_pos)
                .with_velocity(desired_vel);
            let before = desired.clone();

            let enforced = limiter.enforce(&actual, &mut desired, DT);
            prop_assert_eq!(enforced, desired != before);
        }

        #[test]
        fn non_positive_dt_never_mutates(
            dt in -10.0f64..=0.0,
            desired_pos in -100.0f64..100.0,
        ) {
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1").with_position(0.0);
            let mut desired = JointControlSample::new("j1").with_position(desired_pos);
            let before = desired.clone();

            prop_assert!(!limiter.enforce(&actual, &mut desired, dt));
            prop_assert_eq!(desired, before);
        }

        #[test]
        fn outputs_are_finite_even_for_wild_input(
            selector in 0usize..4,
            magnitude in 1.0f64..1e12,
        ) {
            let wild = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, magnitude][selector];
            let mut limiter = soft_limiter(hard_limits());
            let actual = JointControlSample::new("j1")
                .with_position(0.0)
                .with_velocity(0.0);
            let mut desired = JointControlSample::new("j1")
                .with_position(wild)
                .with_velocity(wild)
                .with_acceleration(wild)
                .with_jerk(wild);

            limiter.enforce(&actual, &mut desired, DT);

            prop_assert!(desired.position.expect("position").is_finite());
            prop_assert!(desired.velocity.expect("velocity").is_finite());
            prop_assert!(desired.acceleration.expect("acceleration").is_finite());
            prop_assert!(desired.jerk.expect("jerk").is_finite());
        }

        #[test]
        fn saturation_backend_contains_position_too(
            act_pos in -1.0f64..1.0,
            desired_pos in -100.0f64..100.0,
        ) {
            let mut limiter = JointSaturationLimiter::from_limits(
                vec!["j1".into()],
                vec![hard_limits()],
                vec![],
            )
            .expect("valid limiter");
            let actual = JointControlSample::new("j1").with_position(act_pos);
            let mut desired = JointControlSample::new("j1").with_position(desired_pos);

            limiter.enforce(&actual, &mut desired, DT);

            let out = desired.position.expect("position present");
            prop_assert!(out >= -1.0 - EPS && out <= 1.0 + EPS, "out = {}", out);
        }
    }
}

/// The soft-cushion sign invariant: past the soft bound but inside the hard
/// envelope, the commanded velocity may not exceed the recovery rate.
#[test]
fn cushion_caps_outward_velocity_at_recovery_rate() {
    let limits = JointLimits {
        position: Some(PositionRange::new(-1.0, 1.0)),
        max_velocity: Some(5.0),
        ..Default::default()
    };
    let soft = SoftJointLimits {
        min_position: -0.9,
        max_position: 0.9,
        k_position: 20.0,
        k_velocity: 0.0,
    };
    let mut limiter =
        SoftJointLimiter::from_limits(vec!["j1".into()], vec![limits], vec![soft])
            .expect("valid limiter");

    for act_pos in [0.91, 0.95, 0.999] {
        limiter.reset_internals();
        let actual = JointControlSample::new("j1")
            .with_position(act_pos)
            .with_velocity(0.0);
        let mut desired = JointControlSample::new("j1").with_velocity(4.0);

        assert!(limiter.enforce(&actual, &mut desired, 0.01));
        let out = desired.velocity.expect("velocity present");
        assert!(
            out <= SOFT_LIMIT_RECOVERY_RATE + 1e-12,
            "at {act_pos} the outward velocity {out} exceeds the recovery rate"
        );
    }
}
