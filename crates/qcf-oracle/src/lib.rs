//! `qcf-oracle` — minimum-eigenvalue oracle for Pauli-sum operators.
//!
//! The [`EigenvalueOracle`] trait is the seam the feedback loop calls
//! through. [`StatevectorOracle`] implements it in-process with three
//! strategies:
//!
//! - **exact**: dense diagonalization
//! - **vqe**: TwoLocal ansatz minimized by COBYLA or SPSA
//! - **qaoa**: cost/mixer layers minimized by COBYLA or SPSA
//!
//! ```rust
//! use qcf_operator::{Coefficients, fixed_operator};
//! use qcf_oracle::{EigenvalueOracle, SolverConfig, StatevectorOracle};
//!
//! let op = fixed_operator(&Coefficients::default()).unwrap();
//! let result = StatevectorOracle::new()
//!     .compute_minimum_eigenvalue(op, &SolverConfig::exact())
//!     .unwrap();
//! assert!((result.minimum_energy - (0.2 - 1.34f64.sqrt())).abs() < 1e-9);
//! ```

pub mod ansatz;
pub mod circuit;
pub mod config;
pub mod error;
pub mod exact;
pub mod optimizers;
pub mod oracle;
pub mod statevector;

pub use config::{
    AnsatzConfig, Entanglement, EntanglementGate, OptimizerConfig, OptimizerKind, RotationBlock,
    SolverConfig, SolverStrategy,
};
pub use error::{OracleError, OracleResult};
pub use oracle::{EigenResult, EigenvalueOracle, MAX_QUBITS, StatevectorOracle};
pub use statevector::Statevector;
