//! Fixed-form operator construction.
//!
//! Every operator in the loop has the shape
//!
//!   H = a·Z + b·X + c·Y + d·I  [+ g·(Z ⊗ X)]
//!
//! The bracketed term is present only in coupled mode, where `g` is the
//! current coupling parameter.

use serde::{Deserialize, Serialize};

use crate::error::{OperatorError, OperatorResult};
use crate::operator::OperatorSpec;
use crate::pauli::Pauli;

/// Label of the pairwise coupling term: the first two basis generators.
pub const COUPLING_LABEL: &str = "ZX";

/// Order in which the four basis terms are emitted.
pub const BASIS: [Pauli; 4] = [Pauli::Z, Pauli::X, Pauli::Y, Pauli::I];

/// Coefficients of the four basis terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Z coefficient.
    pub a: f64,
    /// X coefficient.
    pub b: f64,
    /// Y coefficient.
    pub c: f64,
    /// Identity coefficient.
    pub d: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.5,
            c: 0.3,
            d: 0.2,
        }
    }
}

impl Coefficients {
    /// Create a coefficient set.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Coefficients paired with their basis operator, in emission order.
    pub fn as_pairs(&self) -> [(Pauli, f64); 4] {
        [
            (BASIS[0], self.a),
            (BASIS[1], self.b),
            (BASIS[2], self.c),
            (BASIS[3], self.d),
        ]
    }
}

/// Build the operator for the given coefficients.
///
/// `coupling = None` yields the 4-term single-qubit operator; `Some(g)`
/// appends `g·ZX` and the operator spans two qubits.
pub fn build_operator(
    coefficients: &Coefficients,
    coupling: Option<f64>,
) -> OperatorResult<OperatorSpec> {
    let mut pairs: Vec<(String, f64)> = Vec::with_capacity(5);
    for (pauli, value) in coefficients.as_pairs() {
        if !value.is_finite() {
            return Err(OperatorError::InvalidCoefficient {
                label: pauli.name().to_string(),
                value,
            });
        }
        pairs.push((pauli.name().to_string(), value));
    }

    if let Some(g) = coupling {
        if !g.is_finite() {
            return Err(OperatorError::InvalidCoefficient {
                label: COUPLING_LABEL.to_string(),
                value: g,
            });
        }
        pairs.push((COUPLING_LABEL.to_string(), g));
    }

    OperatorSpec::from_list(pairs)
}

/// Fixed-mode operator: four basis terms, no coupling.
pub fn fixed_operator(coefficients: &Coefficients) -> OperatorResult<OperatorSpec> {
    build_operator(coefficients, None)
}

/// Coupled-mode operator: four basis terms plus `coupling·ZX`.
pub fn coupled_operator(coefficients: &Coefficients, coupling: f64) -> OperatorResult<OperatorSpec> {
    build_operator(coefficients, Some(coupling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mode_terms() {
        let op = fixed_operator(&Coefficients::default()).unwrap();
        let labels: Vec<&str> = op.terms().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Z", "X", "Y", "I"]);
        assert_eq!(op.num_qubits(), 1);
        assert!(op.coupling_term().is_none());
    }

    #[test]
    fn test_coupled_mode_terms() {
        let op = coupled_operator(&Coefficients::default(), 0.1).unwrap();
        assert_eq!(op.num_terms(), 5);
        assert_eq!(op.num_qubits(), 2);
        let last = op.terms().last().unwrap();
        assert_eq!(last.label, "ZX");
        assert_eq!(last.coefficient, 0.1);
    }

    #[test]
    fn test_default_coefficients() {
        let op = fixed_operator(&Coefficients::default()).unwrap();
        assert_eq!(op.coefficient("Z"), Some(1.0));
        assert_eq!(op.coefficient("X"), Some(0.5));
        assert_eq!(op.coefficient("Y"), Some(0.3));
        assert_eq!(op.coefficient("I"), Some(0.2));
    }

    #[test]
    fn test_non_finite_basis_coefficient() {
        let coeffs = Coefficients::new(1.0, f64::INFINITY, 0.3, 0.2);
        let err = fixed_operator(&coeffs).unwrap_err();
        assert_eq!(
            err,
            OperatorError::InvalidCoefficient {
                label: "X".into(),
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_non_finite_coupling() {
        let err = coupled_operator(&Coefficients::default(), f64::NAN).unwrap_err();
        assert!(
            matches!(err, OperatorError::InvalidCoefficient { ref label, .. } if label == "ZX")
        );
    }
}
