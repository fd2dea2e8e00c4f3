//! `qcf-operator` — Pauli-sum operators for the coupling feedback loop.
//!
//! Builds the fixed-form operators the loop hands to an eigenvalue oracle:
//!
//! - **fixed mode**: `a·Z + b·X + c·Y + d·I` on one qubit
//! - **coupled mode**: the same plus `g·(Z ⊗ X)` on two qubits
//!
//! ```rust
//! use qcf_operator::{Coefficients, build_operator};
//!
//! let op = build_operator(&Coefficients::default(), Some(0.1)).unwrap();
//! assert_eq!(op.num_terms(), 5);
//! assert_eq!(op.num_qubits(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod operator;
pub mod pauli;

pub use builder::{COUPLING_LABEL, Coefficients, build_operator, coupled_operator, fixed_operator};
pub use error::{OperatorError, OperatorResult};
pub use operator::{OperatorSpec, Term};
pub use pauli::{Pauli, PauliString};
