//! Solver configuration passed to the oracle at call time.
//!
//! Nothing here is process-global: every call receives the full
//! [`SolverConfig`] it should run with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// How the minimum eigenvalue is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverStrategy {
    /// Dense diagonalization of the operator matrix.
    Exact,
    /// Variational eigensolver over a TwoLocal ansatz.
    Vqe,
    /// QAOA: alternating cost-operator evolution and X mixer.
    Qaoa,
}

/// Classical optimizer driving the variational strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Simplex-based COBYLA approximation.
    Cobyla,
    /// Simultaneous perturbation stochastic approximation.
    Spsa,
}

/// Single-qubit rotation used in each TwoLocal rotation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationBlock {
    Rx,
    Ry,
    Rz,
}

/// Two-qubit gate used in each TwoLocal entanglement layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntanglementGate {
    Cz,
    Cx,
}

/// Which qubit pairs an entanglement layer connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entanglement {
    /// Nearest neighbours `(i, i+1)`.
    Linear,
    /// Every pair `i < j`.
    Full,
    /// Linear plus the wrap-around pair `(n-1, 0)`.
    Circular,
}

macro_rules! lowercase_names {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Lowercase name, as accepted by `FromStr`.
            pub fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = OracleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(OracleError::config(format!(
                        concat!("unknown ", $what, " '{}' (expected one of: {})"),
                        other,
                        [$($name),+].join(", ")
                    ))),
                }
            }
        }
    };
}

lowercase_names!(SolverStrategy, "strategy", { Exact => "exact", Vqe => "vqe", Qaoa => "qaoa" });
lowercase_names!(OptimizerKind, "optimizer", { Cobyla => "cobyla", Spsa => "spsa" });
lowercase_names!(RotationBlock, "rotation block", { Rx => "rx", Ry => "ry", Rz => "rz" });
lowercase_names!(EntanglementGate, "entanglement gate", { Cz => "cz", Cx => "cx" });
lowercase_names!(Entanglement, "entanglement topology", {
    Linear => "linear",
    Full => "full",
    Circular => "circular",
});

/// Classical optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Which optimizer to run.
    pub kind: OptimizerKind,
    /// Objective-evaluation budget.
    pub maxiter: usize,
    /// Convergence tolerance on the objective spread.
    pub tol: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            kind: OptimizerKind::Cobyla,
            maxiter: 1000,
            tol: 1e-6,
        }
    }
}

/// Ansatz shape for the variational strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsatzConfig {
    /// Repetitions (TwoLocal layers, or QAOA depth `p`).
    pub reps: usize,
    /// Rotation layer gate.
    pub rotation: RotationBlock,
    /// Entanglement layer gate.
    pub entanglement_gate: EntanglementGate,
    /// Entanglement topology.
    pub entanglement: Entanglement,
}

impl Default for AnsatzConfig {
    fn default() -> Self {
        Self {
            reps: 2,
            rotation: RotationBlock::Ry,
            entanglement_gate: EntanglementGate::Cz,
            entanglement: Entanglement::Full,
        }
    }
}

/// Complete configuration for one oracle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solving strategy.
    pub strategy: SolverStrategy,
    /// Classical optimizer (ignored by `exact`).
    pub optimizer: OptimizerConfig,
    /// Ansatz shape (ignored by `exact`).
    pub ansatz: AnsatzConfig,
    /// Starting parameters; random in `[-π, π)` when absent.
    pub initial_point: Option<Vec<f64>>,
    /// Seed for the initial point and stochastic optimizers.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::vqe_feedback()
    }
}

impl SolverConfig {
    /// QAOA with `p = 1` and a 1000-evaluation COBYLA budget.
    pub fn qaoa_min_cost() -> Self {
        Self {
            strategy: SolverStrategy::Qaoa,
            optimizer: OptimizerConfig::default(),
            ansatz: AnsatzConfig {
                reps: 1,
                ..AnsatzConfig::default()
            },
            initial_point: None,
            seed: 42,
        }
    }

    /// VQE with a depth-3 `ry`/`cz` TwoLocal ansatz.
    pub fn vqe_ground_state() -> Self {
        Self {
            strategy: SolverStrategy::Vqe,
            optimizer: OptimizerConfig::default(),
            ansatz: AnsatzConfig {
                reps: 3,
                ..AnsatzConfig::default()
            },
            initial_point: None,
            seed: 42,
        }
    }

    /// VQE with a depth-2 `ry`/`cz` TwoLocal ansatz, used inside the loop.
    pub fn vqe_feedback() -> Self {
        Self {
            strategy: SolverStrategy::Vqe,
            optimizer: OptimizerConfig::default(),
            ansatz: AnsatzConfig::default(),
            initial_point: None,
            seed: 42,
        }
    }

    /// Exact diagonalization.
    pub fn exact() -> Self {
        Self {
            strategy: SolverStrategy::Exact,
            ..Self::vqe_feedback()
        }
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the ansatz repetitions.
    pub fn with_reps(mut self, reps: usize) -> Self {
        self.ansatz.reps = reps;
        self
    }

    /// Set the evaluation budget.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.optimizer.maxiter = maxiter;
        self
    }

    /// Set the optimizer.
    pub fn with_optimizer(mut self, kind: OptimizerKind) -> Self {
        self.optimizer.kind = kind;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set an explicit initial point.
    pub fn with_initial_point(mut self, point: Vec<f64>) -> Self {
        self.initial_point = Some(point);
        self
    }

    /// Check settings that do not depend on the operator.
    pub fn validate(&self) -> OracleResult<()> {
        if self.strategy == SolverStrategy::Exact {
            return Ok(());
        }
        if self.optimizer.maxiter == 0 {
            return Err(OracleError::config("optimizer evaluation budget must be at least 1"));
        }
        if !self.optimizer.tol.is_finite() || self.optimizer.tol < 0.0 {
            return Err(OracleError::config(format!(
                "optimizer tolerance must be a finite non-negative number, got {}",
                self.optimizer.tol
            )));
        }
        if self.strategy == SolverStrategy::Qaoa && self.ansatz.reps == 0 {
            return Err(OracleError::config("QAOA needs at least one repetition"));
        }
        if let Some(point) = &self.initial_point {
            if let Some(bad) = point.iter().find(|v| !v.is_finite()) {
                return Err(OracleError::config(format!(
                    "initial point contains a non-finite value: {bad}"
                )));
            }
        }
        Ok(())
    }
}
