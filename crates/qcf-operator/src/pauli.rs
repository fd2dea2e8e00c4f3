//! Single-qubit Pauli operators and their tensor products.
//!
//! Labels follow the little-endian convention: the rightmost character of a
//! label acts on qubit 0, so `"ZX"` is `Z₁ ⊗ X₀`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{OperatorError, OperatorResult};

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    /// Parse a single label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as `(qubit, pauli)` pairs sorted by qubit with identities omitted;
/// qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(usize, Pauli)>,
    width: usize,
}

impl PauliString {
    /// Parse a label such as `"Z"`, `"ZX"` or `"IY"`.
    pub fn parse(label: &str) -> OperatorResult<Self> {
        if label.is_empty() {
            return Err(OperatorError::UnknownLabel(label.to_string()));
        }
        let mut ops = Vec::new();
        for (qubit, c) in label.chars().rev().enumerate() {
            let pauli =
                Pauli::from_char(c).ok_or_else(|| OperatorError::UnknownLabel(label.to_string()))?;
            if pauli != Pauli::I {
                ops.push((qubit, pauli));
            }
        }
        Ok(Self {
            ops,
            width: label.chars().count(),
        })
    }

    /// The non-identity `(qubit, pauli)` pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(usize, Pauli)] {
        &self.ops
    }

    /// Number of qubits spanned by the label, identities included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the string to a computational basis index.
    ///
    /// Returns the index of the resulting basis state and the phase picked up.
    pub fn apply_to_basis(&self, index: usize) -> (usize, Complex64) {
        let mut new_index = index;
        // Phase tracked as i^k.
        let mut quarter_turns = 0u8;
        for &(qubit, pauli) in &self.ops {
            let bit = (index >> qubit) & 1;
            match pauli {
                Pauli::I => {}
                Pauli::X => new_index ^= 1 << qubit,
                Pauli::Y => {
                    new_index ^= 1 << qubit;
                    // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
                    quarter_turns = (quarter_turns + if bit == 0 { 1 } else { 3 }) % 4;
                }
                Pauli::Z => {
                    if bit == 1 {
                        quarter_turns = (quarter_turns + 2) % 4;
                    }
                }
            }
        }
        let phase = match quarter_turns {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };
        (new_index, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_little_endian() {
        let ps = PauliString::parse("ZX").unwrap();
        assert_eq!(ps.ops(), &[(0, Pauli::X), (1, Pauli::Z)]);
        assert_eq!(ps.width(), 2);
    }

    #[test]
    fn test_identity_dropped() {
        let ps = PauliString::parse("I").unwrap();
        assert!(ps.is_identity());
        assert_eq!(ps.width(), 1);
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(
            PauliString::parse("ZQ"),
            Err(OperatorError::UnknownLabel(_))
        ));
        assert!(PauliString::parse("").is_err());
    }

    #[test]
    fn test_apply_y() {
        let y = PauliString::parse("Y").unwrap();
        assert_eq!(y.apply_to_basis(0), (1, Complex64::new(0.0, 1.0)));
        assert_eq!(y.apply_to_basis(1), (0, Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_apply_zx() {
        let zx = PauliString::parse("ZX").unwrap();
        // |q1=1, q0=0⟩ -> X flips q0, Z on q1 gives -1
        assert_eq!(zx.apply_to_basis(0b10), (0b11, Complex64::new(-1.0, 0.0)));
        assert_eq!(zx.apply_to_basis(0b00), (0b01, Complex64::new(1.0, 0.0)));
    }
}
