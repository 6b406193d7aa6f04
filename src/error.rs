use thiserror::Error;

/// Failure kinds reported by the numerical primitives.
///
/// These mirror the distinct ways the quadrature, differentiation and
/// root-finding routines can give up, so callers can tell a budget
/// exhaustion apart from a genuine singularity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("maximum number of subdivisions reached during numerical integration")]
    MaxIterations,
    #[error("root finding failed due to no solution at a single point")]
    NoSolution,
    #[error("derivative vanished in root finding solver")]
    ZeroDivision,
    #[error("a singularity was encountered during numerical integration")]
    Singularity,
}

/// Crate-wide error type.
///
/// Every fallible operation in the library surfaces one of these kinds;
/// failures are propagated, never swallowed.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A precondition on the inputs was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An underlying numerical primitive reported an unrecoverable error.
    #[error("numeric failure: {0}")]
    Numeric(#[from] NumericError),
    /// A filter operation was invoked before `initialise`.
    #[error("filter not initialised: {0}")]
    NotInitialised(String),
    /// A filter operation was invoked in a phase that forbids it.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A state blob could not be decoded.
    #[error("state parse error: {0}")]
    StateParse(String),
    /// The operation is mathematically undefined in this configuration.
    #[error("not applicable: {0}")]
    NotApplicable(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::StateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
