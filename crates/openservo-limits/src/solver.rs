//! Per-quantity limit solver.
//!
//! Pure functions that, given a joint's hard limits and the recent state,
//! compute the `[lower, upper]` interval a single quantity may occupy this
//! cycle. The enforcement backends intersect these intervals with their own
//! cushion logic and clamp the desired sample.
//!
//! # RT Safety
//!
//! Every function here is allocation-free, branch-bounded arithmetic.
//! Non-finite state inputs disable the window they would have contributed,
//! never poison the result.

use openservo_types::JointLimits;

use crate::constants::POSITION_BOUNDS_TOLERANCE;

/// An inclusive `[lower, upper]` interval, possibly infinite on either side.
///
/// `lower <= upper` holds for every value produced by this module; an empty
/// intersection collapses to its midpoint and reports
/// [`LimitBounds::is_saturated`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitBounds {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl LimitBounds {
    /// Interval from explicit bounds.
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The unconstrained interval `(-inf, +inf)`.
    pub const fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// The symmetric interval `[-magnitude, +magnitude]`.
    pub fn symmetric(magnitude: f64) -> Self {
        Self {
            lower: -magnitude,
            upper: magnitude,
        }
    }

    /// Intersect with another interval, collapsing an empty result to the
    /// midpoint of the overshoot so callers always see `lower <= upper`.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower > upper {
            let mid = 0.5 * (lower + upper);
            Self {
                lower: mid,
                upper: mid,
            }
        } else {
            Self { lower, upper }
        }
    }

    /// Whether the interval has collapsed to a single value.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.lower == self.upper
    }

    /// Whether `value` lies inside the interval. NaN is never inside.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Clamp `value` into the interval. NaN passes through untouched and is
    /// handled by the sanitation step downstream.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

#[inline]
pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Allowable position interval for the next command.
///
/// The hard position interval, tightened by how far the joint can travel in
/// one timestep at `max_velocity`. The travel window anchors on the previous
/// *commanded* position when available: the robot trails its command by a few
/// cycles, and anchoring on the measured position would fold that lag back
/// into the envelope and choke the reachable velocity.
pub fn compute_position_limits(
    hard: &JointLimits,
    act_pos: Option<f64>,
    prev_cmd_pos: Option<f64>,
    dt_seconds: f64,
) -> LimitBounds {
    let mut bounds = hard
        .position
        .map(|range| LimitBounds::new(range.min, range.max))
        .unwrap_or_else(LimitBounds::unbounded);

    if let Some(max_vel) = hard.max_velocity {
        if let Some(p_ref) = finite(prev_cmd_pos).or(finite(act_pos)) {
            let travel = max_vel * dt_seconds;
            bounds = bounds.intersect(LimitBounds::new(p_ref - travel, p_ref + travel));
        }
    }
    bounds
}

/// Allowable velocity interval for the next command.
///
/// Three nested windows:
/// 1. the hard `±max_velocity` interval;
/// 2. the acceleration window around the previous commanded velocity, where
///    the side that reduces `|velocity|` uses `max_deceleration` when
///    configured;
/// 3. the stop-within-bounds cap: a velocity toward a position bound is
///    admissible only if a worst-case stop at the braking limit still halts
///    inside the envelope (`|v| <= sqrt(2 a d)`).
pub fn compute_velocity_limits(
    hard: &JointLimits,
    act_pos: Option<f64>,
    prev_cmd_vel: Option<f64>,
    dt_seconds: f64,
) -> LimitBounds {
    let mut bounds = hard
        .max_velocity
        .map(LimitBounds::symmetric)
        .unwrap_or_else(LimitBounds::unbounded);

    if let (Some(a_acc), Some(v_prev)) = (hard.max_acceleration, finite(prev_cmd_vel)) {
        let a_dec = hard.max_deceleration.unwrap_or(a_acc);
        let (a_down, a_up) = if v_prev > 0.0 {
            (a_dec, a_acc)
        } else if v_prev < 0.0 {
            (a_acc, a_dec)
        } else {
            (a_acc, a_acc)
        };
        bounds = bounds.intersect(LimitBounds::new(
            v_prev - a_down * dt_seconds,
            v_prev + a_up * dt_seconds,
        ));
    }

    if let (Some(range), Some(p_act)) = (hard.position, finite(act_pos)) {
        if let Some(a_stop) = hard.max_deceleration.or(hard.max_acceleration) {
            let up = (2.0 * a_stop * (range.max - p_act).max(0.0)).sqrt();
            let down = -(2.0 * a_stop * (p_act - range.min).max(0.0)).sqrt();
            bounds = bounds.intersect(LimitBounds::new(down, up));
        }
    }
    bounds
}

/// Allowable acceleration interval for the next command.
///
/// `±max_acceleration`, with the decelerating side (desired acceleration
/// opposing the measured velocity) swapped to `max_deceleration` when that
/// limit is configured.
pub fn compute_acceleration_limits(
    hard: &JointLimits,
    desired_acc: f64,
    act_vel: Option<f64>,
) -> LimitBounds {
    let Some(a_acc) = hard.max_acceleration else {
        return LimitBounds::unbounded();
    };
    let mut bounds = LimitBounds::symmetric(a_acc);
    if let (Some(a_dec), Some(v_act)) = (hard.max_deceleration, finite(act_vel)) {
        if v_act > 0.0 && desired_acc < 0.0 {
            bounds.lower = -a_dec;
        } else if v_act < 0.0 && desired_acc > 0.0 {
            bounds.upper = a_dec;
        }
    }
    bounds
}

/// Allowable effort interval for the next command.
///
/// `±max_effort`, with the side that would push the joint further out zeroed
/// when the joint sits at a hard position bound moving outward, or when the
/// measured velocity already exceeds the velocity limit.
pub fn compute_effort_limits(
    hard: &JointLimits,
    act_pos: Option<f64>,
    act_vel: Option<f64>,
) -> LimitBounds {
    let mut bounds = hard
        .max_effort
        .map(LimitBounds::symmetric)
        .unwrap_or_else(LimitBounds::unbounded);

    if let (Some(range), Some(p_act), Some(v_act)) =
        (hard.position, finite(act_pos), finite(act_vel))
    {
        if p_act > range.max - POSITION_BOUNDS_TOLERANCE && v_act >= 0.0 {
            bounds.upper = bounds.upper.min(0.0);
        } else if p_act < range.min + POSITION_BOUNDS_TOLERANCE && v_act <= 0.0 {
            bounds.lower = bounds.lower.max(0.0);
        }
    }
    if let (Some(max_vel), Some(v_act)) = (hard.max_velocity, finite(act_vel)) {
        if v_act > max_vel {
            bounds.upper = bounds.upper.min(0.0);
        } else if v_act < -max_vel {
            bounds.lower = bounds.lower.max(0.0);
        }
    }
    bounds
}
