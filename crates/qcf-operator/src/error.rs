//! Error types for the operator crate.

use thiserror::Error;

/// Errors produced while building an operator.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum OperatorError {
    /// A coefficient is NaN or infinite.
    #[error("Coefficient for term '{label}' is not finite: {value}")]
    InvalidCoefficient {
        /// Label of the offending term.
        label: String,
        /// The rejected value.
        value: f64,
    },

    /// A label contains a character outside {I, X, Y, Z}.
    #[error("Unknown Pauli label '{0}'")]
    UnknownLabel(String),

    /// The same label appears twice.
    #[error("Duplicate term label '{0}'")]
    DuplicateLabel(String),

    /// A multi-qubit label is followed by another term.
    #[error("Coupling term '{0}' must be the last term")]
    CouplingNotLast(String),
}

/// Result type for operator construction.
pub type OperatorResult<T> = Result<T, OperatorError>;
