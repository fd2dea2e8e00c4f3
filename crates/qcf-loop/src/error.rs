//! Error types for the feedback loop.

use qcf_operator::OperatorError;
use qcf_oracle::OracleError;
use thiserror::Error;

/// Errors that end a feedback run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoopError {
    /// A coefficient (possibly the drifting coupling) was rejected by the builder.
    #[error("Invalid coefficient: {0}")]
    InvalidCoefficient(#[from] OperatorError),

    /// The oracle failed; the run is not retried.
    #[error("Oracle failure: {0}")]
    OracleFailure(#[source] OracleError),

    /// Invalid loop or solver configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cancelled before the given iteration started.
    #[error("Cancelled before iteration {iteration}")]
    Cancelled { iteration: usize },
}

impl LoopError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, LoopError::Configuration(_))
    }
}

/// Solver configuration errors are configuration errors of the run; only
/// real solver failures become [`LoopError::OracleFailure`].
impl From<OracleError> for LoopError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Configuration(msg) => LoopError::Configuration(msg),
            other => LoopError::OracleFailure(other),
        }
    }
}

/// Result type for loop operations.
pub type LoopResult<T> = Result<T, LoopError>;
