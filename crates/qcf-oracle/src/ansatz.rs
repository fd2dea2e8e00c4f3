//! Parameterized trial circuits for the variational strategies.
//!
//! An ansatz is a parameterized circuit; its parameters are optimized
//! classically to minimize the expected energy.

use qcf_operator::OperatorSpec;

use crate::circuit::Circuit;
use crate::config::{AnsatzConfig, Entanglement, EntanglementGate, RotationBlock};

/// Qubit pairs connected by one entanglement layer.
pub fn entanglement_pairs(n_qubits: usize, topology: Entanglement) -> Vec<(usize, usize)> {
    if n_qubits < 2 {
        return Vec::new();
    }
    let linear = (0..n_qubits - 1).map(|q| (q, q + 1));
    match topology {
        Entanglement::Linear => linear.collect(),
        Entanglement::Full => (0..n_qubits)
            .flat_map(|i| (i + 1..n_qubits).map(move |j| (i, j)))
            .collect(),
        Entanglement::Circular => {
            let mut pairs = Vec::with_capacity(n_qubits);
            if n_qubits > 2 {
                pairs.push((n_qubits - 1, 0));
            }
            pairs.extend(linear);
            pairs
        }
    }
}

/// Number of parameters a TwoLocal ansatz needs: `n_qubits * (reps + 1)`.
pub fn two_local_num_parameters(n_qubits: usize, reps: usize) -> usize {
    n_qubits * (reps + 1)
}

/// Number of parameters a depth-`p` QAOA ansatz needs: one γ and one β per layer.
pub fn qaoa_num_parameters(reps: usize) -> usize {
    2 * reps
}

/// Generate a TwoLocal ansatz circuit.
///
/// A rotation layer on every qubit, then `reps` times an entanglement layer
/// followed by another rotation layer.
///
/// # Panics
/// If `params` is shorter than [`two_local_num_parameters`].
pub fn two_local_ansatz(n_qubits: usize, config: &AnsatzConfig, params: &[f64]) -> Circuit {
    let expected = two_local_num_parameters(n_qubits, config.reps);
    assert!(
        params.len() >= expected,
        "Expected {} parameters, got {}",
        expected,
        params.len()
    );

    let mut circuit = Circuit::with_size("two_local", n_qubits);
    let pairs = entanglement_pairs(n_qubits, config.entanglement);
    let mut next = params.iter().copied();

    let mut rotation_layer = |circuit: &mut Circuit| {
        for q in 0..n_qubits {
            let theta = next.next().unwrap_or_default();
            match config.rotation {
                RotationBlock::Rx => circuit.rx(theta, q),
                RotationBlock::Ry => circuit.ry(theta, q),
                RotationBlock::Rz => circuit.rz(theta, q),
            };
        }
    };

    rotation_layer(&mut circuit);
    for _ in 0..config.reps {
        for &(a, b) in &pairs {
            match config.entanglement_gate {
                EntanglementGate::Cz => circuit.cz(a, b),
                EntanglementGate::Cx => circuit.cx(a, b),
            };
        }
        rotation_layer(&mut circuit);
    }

    circuit
}

/// Generate a QAOA circuit for `operator`.
///
/// Starts from `|+⟩^n`; each layer applies `exp(-iγ_k H)` term by term and
/// then the X mixer `exp(-iβ_k Σ X_q)`. Parameters are laid out as
/// `[γ_1..γ_p, β_1..β_p]`.
///
/// # Panics
/// If `params` is shorter than [`qaoa_num_parameters`].
pub fn qaoa_ansatz(operator: &OperatorSpec, reps: usize, params: &[f64]) -> Circuit {
    let expected = qaoa_num_parameters(reps);
    assert!(
        params.len() >= expected,
        "Expected {} parameters, got {}",
        expected,
        params.len()
    );

    let n_qubits = operator.num_qubits();
    let (gammas, betas) = params[..expected].split_at(reps);
    let mut circuit = Circuit::with_size("qaoa", n_qubits);

    for q in 0..n_qubits {
        circuit.h(q);
    }
    for (&gamma, &beta) in gammas.iter().zip(betas) {
        for (pauli, coefficient) in operator.pauli_terms() {
            circuit.pauli_evolution(pauli, gamma * coefficient);
        }
        for q in 0..n_qubits {
            circuit.rx(2.0 * beta, q);
        }
    }

    circuit
}
