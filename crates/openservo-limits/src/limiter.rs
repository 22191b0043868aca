//! Multi-joint limiter frontend.
//!
//! [`JointLimiter`] owns the per-joint limit storage and the lifecycle
//! (init, configure, enforce, reset); the actual enforcement algorithm is a
//! [`LimitEnforcer`] implementation dispatched per cycle. Limit updates
//! published by a parameter thread reach the enforce path through the
//! wait-free handoff of `openservo-atomic`, so a live parameter edit never
//! blocks the realtime thread.

use std::marker::PhantomData;
use std::sync::Arc;

use openservo_atomic::{realtime_handoff, CountersSnapshot, EnforceCounters, HandoffReader, HandoffWriter};
use openservo_types::{JointControlSample, JointLimits, SoftJointLimits};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::{LimiterError, LimiterResult};
use crate::params::{check_for_limits_update, ParameterSource};
use crate::saturation::SaturationEnforcer;
use crate::soft::SoftEnforcer;

/// Borrowed view of the active limits, handed to the backend each cycle.
///
/// The three slices are index-aligned; `soft` is empty when no joint has a
/// soft envelope configured.
#[derive(Debug, Clone, Copy)]
pub struct LimitsView<'a> {
    /// Names of the limited joints
    pub joint_names: &'a [String],
    /// Hard limits, one per joint
    pub hard: &'a [JointLimits],
    /// Soft limits, one per joint, or empty
    pub soft: &'a [SoftJointLimits],
}

/// The enforcement capability implemented by each limiter variant.
///
/// The frontend owns the limits and the lifecycle; implementations own only
/// their filter state (the previous command) and the algorithm.
pub trait LimitEnforcer<S> {
    /// Implementation-specific initialization.
    fn on_init(&mut self, number_of_joints: usize) -> LimiterResult<()>;

    /// Implementation-specific configuration from the current joint state.
    fn on_configure(&self, current_state: &S) -> bool;

    /// Apply the enforcement algorithm.
    ///
    /// Mutates `desired` in place and returns `true` iff any quantity was
    /// altered. Must not allocate, log, or block beyond the backend's own
    /// short mutex.
    fn on_enforce(
        &self,
        limits: &LimitsView<'_>,
        actual: &S,
        desired: &mut S,
        dt_seconds: f64,
    ) -> bool;

    /// Clear the filter state accumulated across cycles.
    fn reset_internals(&self);
}

/// State owned by the parameter-change callback: the non-RT master copy of
/// the hard limits and the producer side of the handoff.
struct SharedLimits {
    joint_names: Vec<String>,
    master: Mutex<Vec<JointLimits>>,
    writer: HandoffWriter<Vec<JointLimits>>,
}

/// Multi-joint limiter generic over the sample type and the enforcement
/// backend.
///
/// # RT Safety
///
/// [`JointLimiter::enforce`] is the only method meant for the realtime
/// thread. It performs one wait-free handoff read, a handful of relaxed
/// counter increments and the backend's bounded-time algorithm. All other
/// methods are configuration-path only and may allocate and log.
pub struct JointLimiter<S, E: LimitEnforcer<S>> {
    joint_names: Vec<String>,
    limits: Vec<JointLimits>,
    soft_limits: Vec<SoftJointLimits>,
    updated_limits: HandoffReader<Vec<JointLimits>>,
    counters: Arc<EnforceCounters>,
    enforcer: E,
    _sample: PhantomData<fn(S)>,
}

impl<S, E: LimitEnforcer<S> + Default> JointLimiter<S, E> {
    /// Build a limiter by declaring and reading every joint's limits through
    /// a parameter source, and subscribe to its change events so later edits
    /// republish a fresh limit vector to the enforce path.
    pub fn from_params<P: ParameterSource + ?Sized>(
        joint_names: Vec<String>,
        source: &P,
    ) -> LimiterResult<Self> {
        let mut limits = Vec::with_capacity(joint_names.len());
        let mut soft_limits = Vec::with_capacity(joint_names.len());
        let mut any_soft = false;

        for name in &joint_names {
            source.declare_joint(name)?;
            let hard = source.joint_limits(name)?;
            hard.validate(name)?;
            info!(joint = %name, limits = %hard, "joint limits loaded");

            let soft = source.soft_joint_limits(name).unwrap_or_default();
            if soft.has_position_range() {
                any_soft = true;
                if let Some(range) = hard.position {
                    if soft.min_position < range.min || soft.max_position > range.max {
                        warn!(
                            joint = %name,
                            "soft position envelope extends beyond the hard envelope"
                        );
                    }
                }
            }
            limits.push(hard);
            soft_limits.push(soft);
        }
        if !any_soft {
            soft_limits.clear();
        }

        let (writer, reader) = realtime_handoff();
        let shared = Arc::new(SharedLimits {
            joint_names: joint_names.clone(),
            master: Mutex::new(limits.clone()),
            writer,
        });
        source.on_parameter_change(Box::new(move |changed| {
            let mut master = shared.master.lock();
            let mut updated = master.clone();
            let mut any_changed = false;
            for (joint, limits) in shared.joint_names.iter().zip(updated.iter_mut()) {
                any_changed |= check_for_limits_update(joint, changed, limits);
            }
            if !any_changed {
                return;
            }
            for (joint, limits) in shared.joint_names.iter().zip(updated.iter()) {
                if let Err(err) = limits.validate(joint) {
                    warn!(%err, "rejecting joint limits update");
                    return;
                }
            }
            master.clone_from(&updated);
            shared.writer.publish(updated);
            info!("joint limits dynamically updated");
        }));

        Self::assemble(joint_names, limits, soft_limits, reader)
    }

    /// Build a limiter from limit vectors directly, bypassing any parameter
    /// source. Limits are fixed for the lifetime of the limiter.
    pub fn from_limits(
        joint_names: Vec<String>,
        limits: Vec<JointLimits>,
        soft_limits: Vec<SoftJointLimits>,
    ) -> LimiterResult<Self> {
        if joint_names.len() != limits.len() {
            return Err(LimiterError::LengthMismatch {
                joints: joint_names.len(),
                limits: limits.len(),
            });
        }
        if !soft_limits.is_empty() && soft_limits.len() != joint_names.len() {
            return Err(LimiterError::LengthMismatch {
                joints: joint_names.len(),
                limits: soft_limits.len(),
            });
        }
        for (joint, hard) in joint_names.iter().zip(limits.iter()) {
            hard.validate(joint)?;
        }
        // Writer dropped: the handoff never yields and the limits stay fixed.
        let (_writer, reader) = realtime_handoff();
        Self::assemble(joint_names, limits, soft_limits, reader)
    }

    fn assemble(
        joint_names: Vec<String>,
        limits: Vec<JointLimits>,
        soft_limits: Vec<SoftJointLimits>,
        updated_limits: HandoffReader<Vec<JointLimits>>,
    ) -> LimiterResult<Self> {
        let mut enforcer = E::default();
        enforcer.on_init(joint_names.len())?;
        Ok(Self {
            joint_names,
            limits,
            soft_limits,
            updated_limits,
            counters: Arc::new(EnforceCounters::new()),
            enforcer,
            _sample: PhantomData,
        })
    }
}

impl<S, E: LimitEnforcer<S>> JointLimiter<S, E> {
    /// Configure the backend from the current joint state.
    pub fn configure(&mut self, current_state: &S) -> bool {
        self.enforcer.on_configure(current_state)
    }

    /// Enforce the limits on `desired` in place.
    ///
    /// Picks up the freshest published limits first, then runs the backend.
    /// Returns `true` iff any quantity was altered. A zero, negative or
    /// non-finite `dt_seconds` rejects the cycle without touching `desired`.
    ///
    /// # RT Safety
    ///
    /// Wait-free handoff read, relaxed counter increments, and the backend's
    /// bounded-time algorithm. No allocation, no logging.
    pub fn enforce(&mut self, actual: &S, desired: &mut S, dt_seconds: f64) -> bool {
        if let Some(fresh) = self.updated_limits.take_update() {
            self.limits = fresh;
        }
        if !(dt_seconds > 0.0) {
            self.counters.inc_rejected_dt();
            return false;
        }
        self.counters.inc_cycle();
        let view = LimitsView {
            joint_names: &self.joint_names,
            hard: &self.limits,
            soft: &self.soft_limits,
        };
        let enforced = self.enforcer.on_enforce(&view, actual, desired, dt_seconds);
        if enforced {
            self.counters.inc_limited_cycle();
        }
        enforced
    }

    /// Clear the backend's filter state and the cycle counters.
    pub fn reset_internals(&mut self) {
        self.enforcer.reset_internals();
        self.counters.reset();
    }

    /// Names of the limited joints.
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    /// The hard limits currently active on the enforce path.
    pub fn limits(&self) -> &[JointLimits] {
        &self.limits
    }

    /// The soft limits configured at init (empty when none).
    pub fn soft_limits(&self) -> &[SoftJointLimits] {
        &self.soft_limits
    }

    /// Snapshot of the enforcement counters.
    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    /// Shared handle to the counters for an external observer thread.
    pub fn counters_handle(&self) -> Arc<EnforceCounters> {
        Arc::clone(&self.counters)
    }
}

impl<S, E: LimitEnforcer<S> + std::fmt::Debug> std::fmt::Debug for JointLimiter<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JointLimiter")
            .field("joint_names", &self.joint_names)
            .field("limits", &self.limits)
            .field("soft_limits", &self.soft_limits)
            .field("enforcer", &self.enforcer)
            .finish_non_exhaustive()
    }
}

/// Soft limiter over single-joint command samples.
pub type SoftJointLimiter = JointLimiter<JointControlSample, SoftEnforcer>;

/// Hard (saturation) limiter over single-joint command samples.
pub type JointSaturationLimiter = JointLimiter<JointControlSample, SaturationEnforcer>;
