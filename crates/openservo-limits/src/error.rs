//! Limiter initialization errors.

use openservo_types::LimitsError;

/// A specialized `Result` type for limiter initialization.
pub type LimiterResult<T> = std::result::Result<T, LimiterError>;

/// Errors surfaced while building or reconfiguring a limiter.
///
/// Nothing on the enforce path returns these; runtime degradation is
/// signalled in-band through the `bool` return of `enforce`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LimiterError {
    /// A joint's declared limits contradict themselves.
    #[error(transparent)]
    InvalidLimits(#[from] LimitsError),

    /// Joint-name and limit vectors have different lengths.
    #[error("number of joint names and limit sets do not match: {joints} != {limits}")]
    LengthMismatch {
        /// Number of joint names passed in
        joints: usize,
        /// Number of limit sets passed in
        limits: usize,
    },

    /// A required parameter was not found on the parameter source.
    #[error("parameter '{0}' is missing")]
    MissingParameter(String),

    /// A parameter exists but holds the wrong type.
    #[error("parameter '{name}' has the wrong type, expected {expected}")]
    WrongParameterType {
        /// Fully qualified parameter name
        name: String,
        /// The type the schema requires
        expected: &'static str,
    },

    /// The enforcement backend cannot handle this many joints.
    #[error("enforcement backend supports exactly one joint, got {0}")]
    UnsupportedJointCount(usize),
}
