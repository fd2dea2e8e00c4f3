//! Dense statevector simulation.
//!
//! Qubit `q` corresponds to bit `q` of the basis index (little-endian), the
//! same convention used by operator labels.

use num_complex::Complex64;
use qcf_operator::{OperatorSpec, PauliString};

use crate::circuit::{Circuit, Gate};
use crate::error::{OracleError, OracleResult};

/// A normalized `2^n`-amplitude state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Run `circuit` from `|0…0⟩`.
    pub fn from_circuit(circuit: &Circuit) -> OracleResult<Self> {
        let mut state = Self::zero(circuit.num_qubits());
        state.apply_circuit(circuit)?;
        Ok(state)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply every gate of `circuit`.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> OracleResult<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(OracleError::failure(format!(
                "circuit '{}' has {} qubits but the state has {}",
                circuit.name(),
                circuit.num_qubits(),
                self.num_qubits
            )));
        }
        for gate in circuit.gates() {
            if let Some(q) = gate.qubits().into_iter().find(|&q| q >= self.num_qubits) {
                return Err(OracleError::failure(format!(
                    "gate {gate:?} references qubit {q} outside a {}-qubit register",
                    self.num_qubits
                )));
            }
            self.apply_gate(gate);
        }
        Ok(())
    }

    fn apply_gate(&mut self, gate: &Gate) {
        let state = &mut self.amplitudes;
        match gate {
            Gate::H(q) => {
                let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                for_each_pair(state.len(), *q, |i, j| {
                    let (a, b) = (state[i], state[j]);
                    state[i] = h * (a + b);
                    state[j] = h * (a - b);
                });
            }
            Gate::Rx(q, theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                for_each_pair(state.len(), *q, |i, j| {
                    let (a, b) = (state[i], state[j]);
                    state[i] = c * a + s * b;
                    state[j] = s * a + c * b;
                });
            }
            Gate::Ry(q, theta) => {
                let c = (theta / 2.0).cos();
                let s = (theta / 2.0).sin();
                for_each_pair(state.len(), *q, |i, j| {
                    let (a, b) = (state[i], state[j]);
                    state[i] = a * c - b * s;
                    state[j] = a * s + b * c;
                });
            }
            Gate::Rz(q, theta) => {
                let phase0 = Complex64::from_polar(1.0, -theta / 2.0);
                let phase1 = Complex64::from_polar(1.0, theta / 2.0);
                for (i, amp) in state.iter_mut().enumerate() {
                    *amp *= if (i >> q) & 1 == 0 { phase0 } else { phase1 };
                }
            }
            Gate::Cx(control, target) => {
                for i in 0..state.len() {
                    if (i >> control) & 1 == 1 && (i >> target) & 1 == 0 {
                        state.swap(i, i | (1 << target));
                    }
                }
            }
            Gate::Cz(a, b) => {
                for (i, amp) in state.iter_mut().enumerate() {
                    if (i >> a) & 1 == 1 && (i >> b) & 1 == 1 {
                        *amp = -*amp;
                    }
                }
            }
            Gate::PauliEvolution(pauli, angle) => {
                // exp(-iθP) = cos θ · 1 - i sin θ · P  (P² = 1)
                let applied = apply_pauli_string(pauli, state);
                let c = angle.cos();
                let minus_i_s = Complex64::new(0.0, -angle.sin());
                for (amp, p_amp) in state.iter_mut().zip(applied) {
                    *amp = *amp * c + minus_i_s * p_amp;
                }
            }
        }
    }

    /// `⟨ψ|P|ψ⟩` for a single Pauli string (always real).
    pub fn pauli_expectation(&self, pauli: &PauliString) -> f64 {
        let applied = apply_pauli_string(pauli, &self.amplitudes);
        self.amplitudes
            .iter()
            .zip(&applied)
            .map(|(a, b)| (a.conj() * b).re)
            .sum()
    }

    /// `⟨ψ|H|ψ⟩` for a full operator.
    pub fn expectation(&self, operator: &OperatorSpec) -> f64 {
        operator
            .pauli_terms()
            .map(|(pauli, coefficient)| {
                if pauli.is_identity() {
                    coefficient
                } else {
                    coefficient * self.pauli_expectation(pauli)
                }
            })
            .sum()
    }
}

/// Visit every `(i, j)` basis pair that differs only in bit `q`, with bit `q` of `i` clear.
fn for_each_pair(len: usize, q: usize, mut f: impl FnMut(usize, usize)) {
    for i in 0..len {
        if (i >> q) & 1 == 0 {
            f(i, i | (1 << q));
        }
    }
}

/// Compute `P|ψ⟩` into a fresh buffer.
fn apply_pauli_string(pauli: &PauliString, state: &[Complex64]) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); state.len()];
    for (i, &amp) in state.iter().enumerate() {
        let (j, phase) = pauli.apply_to_basis(i);
        out[j] = phase * amp;
    }
    out
}
