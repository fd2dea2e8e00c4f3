//! Error types for the oracle crate.

use thiserror::Error;

/// Boxed cause carried by [`OracleError::Failure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by an eigenvalue oracle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// The solver configuration is invalid; raised before any evaluation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The underlying solver failed.
    #[error("Oracle failure: {0}")]
    Failure(#[source] BoxError),
}

impl OracleError {
    /// Wrap any error (or message) as an oracle failure.
    pub fn failure(cause: impl Into<BoxError>) -> Self {
        Self::Failure(cause.into())
    }

    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
