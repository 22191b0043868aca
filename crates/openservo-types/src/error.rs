//! Limit configuration validation errors.

/// Errors raised when a declared limit set contradicts itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LimitsError {
    /// The position interval is inverted.
    #[error("joint '{joint}': min_position {min} exceeds max_position {max}")]
    PositionRangeInverted {
        /// Joint the limits belong to
        joint: String,
        /// Declared lower position bound
        min: f64,
        /// Declared upper position bound
        max: f64,
    },

    /// A magnitude limit is zero, negative or non-finite.
    #[error("joint '{joint}': {quantity} limit {value} must be strictly positive and finite")]
    InvalidMagnitude {
        /// Joint the limits belong to
        joint: String,
        /// Which limit failed validation
        quantity: &'static str,
        /// The offending value
        value: f64,
    },

    /// A position bound is non-finite.
    #[error("joint '{joint}': position bound {value} must be finite")]
    NonFinitePositionBound {
        /// Joint the limits belong to
        joint: String,
        /// The offending value
        value: f64,
    },
}

impl LimitsError {
    /// Create an [`LimitsError::InvalidMagnitude`] for a named quantity.
    pub fn invalid_magnitude(
        joint: impl Into<String>,
        quantity: &'static str,
        value: f64,
    ) -> Self {
        LimitsError::InvalidMagnitude {
            joint: joint.into(),
            quantity,
            value,
        }
    }
}
