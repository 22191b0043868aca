//! Parameter-source capability and the per-joint limit schema.
//!
//! Limits live in a flat per-joint key namespace
//! (`<joint>.has_velocity_limits`, `<joint>.max_velocity`, ...). A
//! [`ParameterSource`] yields them at init and notifies a registered
//! callback when keys change; [`check_for_limits_update`] folds such a
//! change batch back into a [`JointLimits`]. [`MapParameterSource`] is the
//! in-memory reference implementation used by the tests and by embedders
//! that keep their configuration in plain maps.

use std::collections::HashMap;

use openservo_types::{JointLimits, PositionRange, SoftJointLimits};
use parking_lot::RwLock;
use tracing::warn;

use crate::error::{LimiterError, LimiterResult};

/// A typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Boolean flag, used by the `has_*` schema keys
    Bool(bool),
    /// Floating point value, used by the limit magnitudes and bounds
    Float(f64),
}

impl ParameterValue {
    /// The boolean payload, if this is a [`ParameterValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(value) => Some(*value),
            ParameterValue::Float(_) => None,
        }
    }

    /// The float payload, if this is a [`ParameterValue::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(value) => Some(*value),
            ParameterValue::Bool(_) => None,
        }
    }
}

/// One changed key/value pair delivered to a change callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Fully qualified name, `<joint>.<key>`
    pub name: String,
    /// The new value
    pub value: ParameterValue,
}

impl Parameter {
    /// Create a parameter from a name and value.
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Callback invoked with a batch of changed parameters, on the source's own
/// (non-realtime) thread.
pub type ParameterChangeCallback = Box<dyn Fn(&[Parameter]) + Send + Sync>;

/// Capability the limiter frontend needs from the configuration layer.
pub trait ParameterSource: Send + Sync {
    /// Make a joint's limit keys available, filling in schema defaults.
    fn declare_joint(&self, joint_name: &str) -> LimiterResult<()>;

    /// Read the joint's hard limits from the schema keys.
    fn joint_limits(&self, joint_name: &str) -> LimiterResult<JointLimits>;

    /// Read the joint's soft limits, if `has_soft_limits` is set.
    fn soft_joint_limits(&self, joint_name: &str) -> Option<SoftJointLimits>;

    /// Register a callback for future parameter edits.
    fn on_parameter_change(&self, callback: ParameterChangeCallback);
}

/// Fold a batch of changed parameters into one joint's hard limits.
///
/// Returns whether anything changed for this joint. A `has_*` flag set to
/// `false` deactivates the quantity; enabling one picks its value from the
/// same batch or the already-active value, and is otherwise ignored with a
/// warning (a limit cannot activate without a magnitude).
pub fn check_for_limits_update(
    joint_name: &str,
    changed: &[Parameter],
    limits: &mut JointLimits,
) -> bool {
    let original = *limits;

    let lookup = |key: &str| {
        changed.iter().rev().find_map(|param| {
            let rest = param.name.strip_prefix(joint_name)?;
            let rest = rest.strip_prefix('.')?;
            (rest == key).then_some(param.value)
        })
    };
    let changed_bool = |key: &str| lookup(key).and_then(|value| value.as_bool());
    let changed_float = |key: &str| lookup(key).and_then(|value| value.as_float());

    let enabled = changed_bool("has_position_limits").unwrap_or(limits.position.is_some());
    if enabled {
        let current = limits.position;
        let min = changed_float("min_position").or(current.map(|range| range.min));
        let max = changed_float("max_position").or(current.map(|range| range.max));
        match (min, max) {
            (Some(min), Some(max)) => limits.position = Some(PositionRange::new(min, max)),
            _ => warn!(
                joint = joint_name,
                "ignoring has_position_limits without position bounds"
            ),
        }
    } else {
        limits.position = None;
    }

    let apply_scalar = |flag_key: &str, value_key: &str, slot: &mut Option<f64>| {
        let enabled = changed_bool(flag_key).unwrap_or(slot.is_some());
        if enabled {
            match changed_float(value_key).or(*slot) {
                Some(value) => *slot = Some(value),
                None => warn!(
                    joint = joint_name,
                    key = value_key,
                    "ignoring limit flag without a magnitude"
                ),
            }
        } else {
            *slot = None;
        }
    };

    apply_scalar("has_velocity_limits", "max_velocity", &mut limits.max_velocity);
    apply_scalar(
        "has_acceleration_limits",
        "max_acceleration",
        &mut limits.max_acceleration,
    );
    apply_scalar(
        "has_deceleration_limits",
        "max_deceleration",
        &mut limits.max_deceleration,
    );
    apply_scalar("has_jerk_limits", "max_jerk", &mut limits.max_jerk);
    apply_scalar("has_effort_limits", "max_effort", &mut limits.max_effort);

    *limits != original
}

/// In-memory [`ParameterSource`] over a key/value map.
///
/// [`MapParameterSource::set`] stores a value and synchronously notifies the
/// registered callbacks on the calling thread, which plays the role of the
/// non-realtime parameter thread.
#[derive(Default)]
pub struct MapParameterSource {
    values: RwLock<HashMap<String, ParameterValue>>,
    callbacks: RwLock<Vec<ParameterChangeCallback>>,
}

impl std::fmt::Debug for MapParameterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapParameterSource")
            .field("values", &*self.values.read())
            .field("callbacks", &self.callbacks.read().len())
            .finish()
    }
}

impl MapParameterSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value without notifying callbacks. Initial configuration.
    pub fn insert(&self, name: impl Into<String>, value: ParameterValue) {
        self.values.write().insert(name.into(), value);
    }

    /// Store a value and notify every registered callback.
    pub fn set(&self, name: impl Into<String>, value: ParameterValue) {
        let param = Parameter::new(name, value);
        self.values
            .write()
            .insert(param.name.clone(), param.value);
        let batch = [param];
        for callback in self.callbacks.read().iter() {
            callback(&batch);
        }
    }

    /// Store a batch of values and notify callbacks once with the full batch.
    pub fn set_many(&self, batch: Vec<Parameter>) {
        {
            let mut values = self.values.write();
            for param in &batch {
                values.insert(param.name.clone(), param.value);
            }
        }
        for callback in self.callbacks.read().iter() {
            callback(&batch);
        }
    }

    fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.read().get(name).copied()
    }

    fn bool_or(&self, name: &str, default: bool) -> LimiterResult<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(ParameterValue::Bool(value)) => Ok(value),
            Some(ParameterValue::Float(_)) => Err(LimiterError::WrongParameterType {
                name: name.into(),
                expected: "bool",
            }),
        }
    }

    fn float_required(&self, name: &str) -> LimiterResult<f64> {
        match self.get(name) {
            None => Err(LimiterError::MissingParameter(name.into())),
            Some(ParameterValue::Float(value)) => Ok(value),
            Some(ParameterValue::Bool(_)) => Err(LimiterError::WrongParameterType {
                name: name.into(),
                expected: "float",
            }),
        }
    }

    fn float_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(|value| value.as_float()).unwrap_or(default)
    }

    fn scalar_limit(&self, joint: &str, flag: &str, value: &str) -> LimiterResult<Option<f64>> {
        if self.bool_or(&format!("{joint}.{flag}"), false)? {
            Ok(Some(self.float_required(&format!("{joint}.{value}"))?))
        } else {
            Ok(None)
        }
    }
}

impl ParameterSource for MapParameterSource {
    fn declare_joint(&self, joint_name: &str) -> LimiterResult<()> {
        let flags = [
            "has_position_limits",
            "has_velocity_limits",
            "has_acceleration_limits",
            "has_deceleration_limits",
            "has_jerk_limits",
            "has_effort_limits",
            "has_soft_limits",
        ];
        let mut values = self.values.write();
        for flag in flags {
            values
                .entry(format!("{joint_name}.{flag}"))
                .or_insert(ParameterValue::Bool(false));
        }
        Ok(())
    }

    fn joint_limits(&self, joint_name: &str) -> LimiterResult<JointLimits> {
        let position = if self.bool_or(&format!("{joint_name}.has_position_limits"), false)? {
            Some(PositionRange::new(
                self.float_required(&format!("{joint_name}.min_position"))?,
                self.float_required(&format!("{joint_name}.max_position"))?,
            ))
        } else {
            None
        };
        Ok(JointLimits {
            position,
            max_velocity: self.scalar_limit(joint_name, "has_velocity_limits", "max_velocity")?,
            max_acceleration: self.scalar_limit(
                joint_name,
                "has_acceleration_limits",
                "max_acceleration",
            )?,
            max_deceleration: self.scalar_limit(
                joint_name,
                "has_deceleration_limits",
                "max_deceleration",
            )?,
            max_jerk: self.scalar_limit(joint_name, "has_jerk_limits", "max_jerk")?,
            max_effort: self.scalar_limit(joint_name, "has_effort_limits", "max_effort")?,
        })
    }

    fn soft_joint_limits(&self, joint_name: &str) -> Option<SoftJointLimits> {
        let enabled = self
            .bool_or(&format!("{joint_name}.has_soft_limits"), false)
            .unwrap_or(false);
        if !enabled {
            return None;
        }
        Some(SoftJointLimits {
            min_position: self.float_or(&format!("{joint_name}.soft_min_position"), 0.0),
            max_position: self.float_or(&format!("{joint_name}.soft_max_position"), 0.0),
            k_position: self.float_or(&format!("{joint_name}.k_position"), 0.0),
            k_velocity: self.float_or(&format!("{joint_name}.k_velocity"), 0.0),
        })
    }

    fn on_parameter_change(&self, callback: ParameterChangeCallback) {
        self.callbacks.write().push(callback);
    }
}
