//! Per-cycle joint command / measurement sample.

use serde::{Deserialize, Serialize};

/// One joint's command or measurement for a single control cycle.
///
/// Each quantity carries its own presence flag; a controller that only
/// commands velocity leaves the other fields `None` and the enforcement core
/// only touches what is present. A sample with no quantities at all is
/// *empty* ([`JointControlSample::is_empty`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointControlSample {
    /// Name of the joint this sample belongs to
    pub joint_name: String,
    /// Position, rad
    pub position: Option<f64>,
    /// Velocity, rad/s
    pub velocity: Option<f64>,
    /// Effort, Nm
    pub effort: Option<f64>,
    /// Acceleration, rad/s^2
    pub acceleration: Option<f64>,
    /// Jerk, rad/s^3
    pub jerk: Option<f64>,
}

impl JointControlSample {
    /// Create an empty sample for a named joint.
    pub fn new(joint_name: impl Into<String>) -> Self {
        Self {
            joint_name: joint_name.into(),
            ..Default::default()
        }
    }

    /// Set the position quantity.
    #[must_use]
    pub fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the velocity quantity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set the effort quantity.
    #[must_use]
    pub fn with_effort(mut self, effort: f64) -> Self {
        self.effort = Some(effort);
        self
    }

    /// Set the acceleration quantity.
    #[must_use]
    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Set the jerk quantity.
    #[must_use]
    pub fn with_jerk(mut self, jerk: f64) -> Self {
        self.jerk = Some(jerk);
        self
    }

    /// Whether at least one quantity is present.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.position.is_some()
            || self.velocity.is_some()
            || self.effort.is_some()
            || self.acceleration.is_some()
            || self.jerk.is_some()
    }

    /// Whether no quantity is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }

    /// Drop all quantities, keeping the joint name.
    pub fn clear(&mut self) {
        self.position = None;
        self.velocity = None;
        self.effort = None;
        self.acceleration = None;
        self.jerk = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sample_is_empty() {
        let sample = JointControlSample::new("elbow");
        assert_eq!(sample.joint_name, "elbow");
        assert!(sample.is_empty());
        assert!(!sample.has_data());
    }

    #[test]
    fn test_any_single_quantity_counts_as_data() {
        let checks = [
            JointControlSample::new("j").with_position(0.0),
            JointControlSample::new("j").with_velocity(0.0),
            JointControlSample::new("j").with_effort(0.0),
            JointControlSample::new("j").with_acceleration(0.0),
            JointControlSample::new("j").with_jerk(0.0),
        ];
        for sample in checks {
            assert!(sample.has_data());
            assert!(!sample.is_empty());
        }
    }

    #[test]
    fn test_clear_keeps_joint_name() {
        let mut sample = JointControlSample::new("wrist")
            .with_position(1.0)
            .with_velocity(2.0);
        sample.clear();
        assert!(sample.is_empty());
        assert_eq!(sample.joint_name, "wrist");
    }

    #[test]
    fn test_builder_chains_compose() {
        let sample = JointControlSample::new("j1")
            .with_position(0.1)
            .with_velocity(0.2)
            .with_effort(0.3);
        assert_eq!(sample.position, Some(0.1));
        assert_eq!(sample.velocity, Some(0.2));
        assert_eq!(sample.effort, Some(0.3));
        assert_eq!(sample.acceleration, None);
        assert_eq!(sample.jerk, None);
    }
}
