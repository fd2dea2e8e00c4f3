//! Weighted sums of labelled Pauli terms.
//!
//! An [`OperatorSpec`] is the immutable value handed to an eigenvalue oracle:
//!
//!   H = Σ_k  c_k · P_k
//!
//! with each `P_k` written as a label over {I, X, Y, Z}.

use serde::{Deserialize, Serialize};

use crate::error::{OperatorError, OperatorResult};
use crate::pauli::PauliString;

/// A single labelled term `coefficient · label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Pauli label, little-endian (rightmost character is qubit 0).
    pub label: String,
    /// Real, finite coefficient.
    pub coefficient: f64,
}

impl Term {
    /// Parse the label into a [`PauliString`].
    pub fn pauli_string(&self) -> OperatorResult<PauliString> {
        PauliString::parse(&self.label)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.4} {}", self.coefficient, self.label)
        } else {
            write!(f, "{:.4} {}", self.coefficient, self.label)
        }
    }
}

/// An ordered, validated list of Pauli terms.
///
/// Invariants checked on construction: coefficients are finite, labels are
/// unique, and a multi-qubit label may only appear as the last term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Term>", into = "Vec<Term>")]
pub struct OperatorSpec {
    terms: Vec<Term>,
    paulis: Vec<PauliString>,
    num_qubits: usize,
}

impl OperatorSpec {
    /// Build an operator from `(label, coefficient)` pairs.
    pub fn from_list<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> OperatorResult<Self> {
        let terms: Vec<Term> = pairs
            .into_iter()
            .map(|(label, coefficient)| Term {
                label: label.into(),
                coefficient,
            })
            .collect();
        Self::from_terms(terms)
    }

    /// Build an operator from already-constructed terms.
    pub fn from_terms(terms: Vec<Term>) -> OperatorResult<Self> {
        let mut num_qubits = 0;
        let mut paulis = Vec::with_capacity(terms.len());
        for (idx, term) in terms.iter().enumerate() {
            if !term.coefficient.is_finite() {
                return Err(OperatorError::InvalidCoefficient {
                    label: term.label.clone(),
                    value: term.coefficient,
                });
            }
            let pauli = term.pauli_string()?;
            if terms[..idx].iter().any(|t| t.label == term.label) {
                return Err(OperatorError::DuplicateLabel(term.label.clone()));
            }
            if pauli.width() > 1 && idx + 1 != terms.len() {
                return Err(OperatorError::CouplingNotLast(term.label.clone()));
            }
            num_qubits = num_qubits.max(pauli.width());
            paulis.push(pauli);
        }
        Ok(Self {
            terms,
            paulis,
            num_qubits,
        })
    }

    /// The terms, in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Get the number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits the widest label spans.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Coefficient of the term with the given label, if present.
    pub fn coefficient(&self, label: &str) -> Option<f64> {
        self.terms
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.coefficient)
    }

    /// The trailing two-qubit coupling term, if any.
    pub fn coupling_term(&self) -> Option<&Term> {
        self.terms.last().filter(|t| t.label.chars().count() > 1)
    }

    /// Parsed `(PauliString, coefficient)` pairs for simulation.
    pub fn pauli_terms(&self) -> impl Iterator<Item = (&PauliString, f64)> + '_ {
        self.paulis
            .iter()
            .zip(&self.terms)
            .map(|(ps, t)| (ps, t.coefficient))
    }
}

impl TryFrom<Vec<Term>> for OperatorSpec {
    type Error = OperatorError;

    fn try_from(terms: Vec<Term>) -> Result<Self, Self::Error> {
        Self::from_terms(terms)
    }
}

impl From<OperatorSpec> for Vec<Term> {
    fn from(spec: OperatorSpec) -> Self {
        spec.terms
    }
}

impl std::fmt::Display for OperatorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Operator ({} terms, {} qubits):",
            self.num_terms(),
            self.num_qubits()
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list() {
        let op = OperatorSpec::from_list([("Z", 1.0), ("X", 0.5), ("ZX", 0.1)]).unwrap();
        assert_eq!(op.num_terms(), 3);
        assert_eq!(op.num_qubits(), 2);
        assert_eq!(op.coefficient("X"), Some(0.5));
        assert_eq!(op.coupling_term().map(|t| t.coefficient), Some(0.1));
    }

    #[test]
    fn test_rejects_nan() {
        let err = OperatorSpec::from_list([("Z", f64::NAN)]).unwrap_err();
        assert!(matches!(err, OperatorError::InvalidCoefficient { .. }));
    }

    #[test]
    fn test_rejects_duplicate() {
        let err = OperatorSpec::from_list([("Z", 1.0), ("Z", 2.0)]).unwrap_err();
        assert_eq!(err, OperatorError::DuplicateLabel("Z".into()));
    }

    #[test]
    fn test_coupling_must_be_last() {
        let err = OperatorSpec::from_list([("ZX", 1.0), ("Z", 2.0)]).unwrap_err();
        assert_eq!(err, OperatorError::CouplingNotLast("ZX".into()));
    }

    #[test]
    fn test_display() {
        let op = OperatorSpec::from_list([("Z", 1.0), ("Y", -0.3)]).unwrap();
        let text = op.to_string();
        assert!(text.contains("+1.0000 Z"));
        assert!(text.contains("-0.3000 Y"));
    }
}
