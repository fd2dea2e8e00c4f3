//! Exact minimum eigenvalue by dense diagonalization of the operator matrix.

use nalgebra::DMatrix;
use num_complex::Complex64;
use qcf_operator::OperatorSpec;

use crate::error::{OracleError, OracleResult};

/// Dense `2^n × 2^n` matrix of `operator`.
pub fn operator_matrix(operator: &OperatorSpec) -> DMatrix<Complex64> {
    let dim = 1usize << operator.num_qubits();
    let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
    for (pauli, coefficient) in operator.pauli_terms() {
        for col in 0..dim {
            let (row, phase) = pauli.apply_to_basis(col);
            matrix[(row, col)] += phase * coefficient;
        }
    }
    matrix
}

/// Smallest eigenvalue of `operator`.
pub fn minimum_eigenvalue(operator: &OperatorSpec) -> OracleResult<f64> {
    let matrix = operator_matrix(operator);
    if matrix.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(OracleError::failure("operator matrix has non-finite entries"));
    }
    matrix
        .symmetric_eigenvalues()
        .iter()
        .copied()
        .min_by(f64::total_cmp)
        .ok_or_else(|| OracleError::failure("operator has an empty spectrum"))
}
