//! Minimal gate-list circuits consumed by the statevector simulator.

use qcf_operator::PauliString;

/// A gate with bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Hadamard.
    H(usize),
    /// X rotation by θ.
    Rx(usize, f64),
    /// Y rotation by θ.
    Ry(usize, f64),
    /// Z rotation by θ.
    Rz(usize, f64),
    /// Controlled-X (control, target).
    Cx(usize, usize),
    /// Controlled-Z.
    Cz(usize, usize),
    /// `exp(-i·angle·P)` for a Pauli string `P`.
    PauliEvolution(PauliString, f64),
}

impl Gate {
    /// Qubits the gate touches.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::H(q) | Gate::Rx(q, _) | Gate::Ry(q, _) | Gate::Rz(q, _) => vec![*q],
            Gate::Cx(a, b) | Gate::Cz(a, b) => vec![*a, *b],
            Gate::PauliEvolution(p, _) => p.ops().iter().map(|(q, _)| *q).collect(),
        }
    }
}

/// An ordered list of gates on a fixed register.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn with_size(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    pub fn num_ops(&self) -> usize {
        self.gates.len()
    }

    /// Append a gate.
    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn h(&mut self, q: usize) -> &mut Self {
        self.push(Gate::H(q))
    }

    pub fn rx(&mut self, theta: f64, q: usize) -> &mut Self {
        self.push(Gate::Rx(q, theta))
    }

    pub fn ry(&mut self, theta: f64, q: usize) -> &mut Self {
        self.push(Gate::Ry(q, theta))
    }

    pub fn rz(&mut self, theta: f64, q: usize) -> &mut Self {
        self.push(Gate::Rz(q, theta))
    }

    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(Gate::Cx(control, target))
    }

    pub fn cz(&mut self, a: usize, b: usize) -> &mut Self {
        self.push(Gate::Cz(a, b))
    }

    /// Append `exp(-i·angle·P)`; identity strings are a global phase and dropped.
    pub fn pauli_evolution(&mut self, pauli: &PauliString, angle: f64) -> &mut Self {
        if !pauli.is_identity() {
            self.push(Gate::PauliEvolution(pauli.clone(), angle));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let mut c = Circuit::with_size("t", 2);
        c.h(0).cx(0, 1).ry(0.5, 1);
        assert_eq!(c.num_ops(), 3);
        assert_eq!(c.gates()[1].qubits(), vec![0, 1]);
    }

    #[test]
    fn test_identity_evolution_dropped() {
        let mut c = Circuit::with_size("t", 1);
        c.pauli_evolution(&PauliString::parse("I").unwrap(), 0.3);
        assert_eq!(c.num_ops(), 0);
    }
}
