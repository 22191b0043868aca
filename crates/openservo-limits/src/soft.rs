//! Soft (cushion) limit enforcement.
//!
//! [`SoftEnforcer`] couples position, velocity, acceleration, jerk and
//! effort through finite-difference windows over the elapsed timestep. On
//! top of the hard envelope it applies a virtual cushion: approaching a soft
//! position bound shrinks the admissible velocity proportionally
//! (`k_position`), and exceeding the admissible velocity shrinks the
//! admissible effort (`k_velocity`), so the joint decelerates before it can
//! ever touch a hard bound.
//!
//! # RT Safety
//!
//! `on_enforce` runs under one short mutex acquisition (uncontended in
//! practice: only the realtime thread takes it), performs bounded-time
//! arithmetic and never allocates, logs, or blocks elsewhere.

use openservo_types::JointControlSample;
use parking_lot::Mutex;

use crate::constants::{POSITION_BOUNDS_TOLERANCE, SOFT_LIMIT_RECOVERY_RATE};
use crate::error::{LimiterError, LimiterResult};
use crate::limiter::{LimitEnforcer, LimitsView};
use crate::solver::{
    compute_acceleration_limits, compute_effort_limits, compute_position_limits,
    compute_velocity_limits, finite,
};
use crate::tracking::{sanitize_non_finite, seed_prev_command, update_prev_command};

/// Per-joint soft-limit enforcement backend.
///
/// Owns the previous commanded sample; the limits are handed in by the
/// frontend each cycle. Single-joint: `on_init` rejects any other count.
#[derive(Debug, Default)]
pub struct SoftEnforcer {
    prev_command: Mutex<JointControlSample>,
}

impl LimitEnforcer<JointControlSample> for SoftEnforcer {
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
        let soft = limits.soft.first().copied().unwrap_or_default();

        let mut prev = self.prev_command.lock();
        let mut limits_enforced = false;

        seed_prev_command(&mut prev, actual, desired);

        let act_pos = finite(actual.position).or(finite(prev.position));
        let prev_cmd_pos = finite(prev.position).or(finite(actual.position));

        let mut soft_min_vel = f64::NEG_INFINITY;
        let mut soft_max_vel = f64::INFINITY;

        if let Some(max_vel) = hard.max_velocity {
            soft_min_vel = -max_vel;
            soft_max_vel = max_vel;

            // The cushion anchors on the previous *commanded* position: the
            // robot trails the command by a couple of cycles, and anchoring
            // on the measured position would fold that lag back into the
            // envelope and cap the joint well below its real velocity limit.
            if let (Some(range), true, Some(prev_pos)) =
                (hard.position, soft.has_soft_limits(), prev_cmd_pos)
            {
                soft_min_vel = (-soft.k_position * (prev_pos - soft.min_position))
                    .clamp(-max_vel, max_vel);
                soft_max_vel = (-soft.k_position * (prev_pos - soft.max_position))
                    .clamp(-max_vel, max_vel);

                // prev_cmd_pos being finite implies act_pos is too.
                let act = act_pos.unwrap_or(prev_pos);
                if act < range.min - POSITION_BOUNDS_TOLERANCE
                    || act > range.max + POSITION_BOUNDS_TOLERANCE
                {
                    // Escaped the hard envelope: freeze the joint.
                    soft_min_vel = 0.0;
                    soft_max_vel = 0.0;
                } else if act < soft.min_position || act > soft.max_position {
                    // Inside the hard envelope but past the soft one: creep
                    // back in at the recovery rate.
                    soft_min_vel = SOFT_LIMIT_RECOVERY_RATE.copysign(soft_min_vel);
                    soft_max_vel = SOFT_LIMIT_RECOVERY_RATE.copysign(soft_max_vel);
                }
            }
        }

        if let Some(desired_pos) = desired.position {
            let position_limits =
                compute_position_limits(hard, actual.position, prev.position, dt_seconds);

            let (mut pos_low, mut pos_high) = if soft.has_position_range() {
                (soft.min_position, soft.max_position)
            } else {
                (f64::NEG_INFINITY, f64::INFINITY)
            };

            if hard.has_velocity_limits() {
                if let Some(prev_pos) = prev_cmd_pos {
                    pos_low = (prev_pos + soft_min_vel * dt_seconds).clamp(pos_low, pos_high);
                    pos_high = (prev_pos + soft_max_vel * dt_seconds).clamp(pos_low, pos_high);
                }
            }
            pos_low = pos_low.max(position_limits.lower);
            pos_high = pos_high.min(position_limits.upper);
            if pos_low > pos_high {
                let mid = 0.5 * (pos_low + pos_high);
                pos_low = mid;
                pos_high = mid;
            }

            limits_enforced |= desired_pos < pos_low || desired_pos > pos_high;
            desired.position = Some(desired_pos.clamp(pos_low, pos_high));
        }

        if let Some(desired_vel) = desired.velocity {
            let velocity_limits =
                compute_velocity_limits(hard, actual.position, prev.velocity, dt_seconds);

            if let (Some(max_acc), Some(act_vel)) =
                (hard.max_acceleration, finite(actual.velocity))
            {
                soft_min_vel = soft_min_vel.max(act_vel - max_acc * dt_seconds);
                soft_max_vel = soft_max_vel.min(act_vel + max_acc * dt_seconds);
            }

            soft_min_vel = soft_min_vel.max(velocity_limits.lower);
            soft_max_vel = soft_max_vel.min(velocity_limits.upper);
            if soft_min_vel > soft_max_vel {
                let mid = 0.5 * (soft_min_vel + soft_max_vel);
                soft_min_vel = mid;
                soft_max_vel = mid;
            }

            limits_enforced |= desired_vel < soft_min_vel || desired_vel > soft_max_vel;
            desired.velocity = Some(desired_vel.clamp(soft_min_vel, soft_max_vel));
        }

        if let Some(desired_eff) = desired.effort {
            let effort_limits = compute_effort_limits(hard, actual.position, actual.velocity);

            let mut min_eff = effort_limits.lower;
            let mut max_eff = effort_limits.upper;

            if let (Some(max_effort), true, Some(act_vel)) =
                (hard.max_effort, soft.has_velocity_gain(), finite(actual.velocity))
            {
                let cushion_min = (-soft.k_velocity * (act_vel - soft_min_vel))
                    .clamp(-max_effort, max_effort);
                let cushion_max = (-soft.k_velocity * (act_vel - soft_max_vel))
                    .clamp(-max_effort, max_effort);
                min_eff = cushion_min.max(effort_limits.lower);
                max_eff = cushion_max.min(effort_limits.upper);
                if min_eff > max_eff {
                    let mid = 0.5 * (min_eff + max_eff);
                    min_eff = mid;
                    max_eff = mid;
                }
            }

            limits_enforced |= desired_eff < min_eff || desired_eff > max_eff;
            desired.effort = Some(desired_eff.clamp(min_eff, max_eff));
        }

        if let Some(desired_acc) = desired.acceleration {
            let acc_limits = compute_acceleration_limits(hard, desired_acc, actual.velocity);
            limits_enforced |= desired_acc < acc_limits.lower || desired_acc > acc_limits.upper;
            desired.acceleration = Some(acc_limits.clamp(desired_acc));
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
