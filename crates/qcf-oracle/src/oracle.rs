//! The minimum-eigenvalue oracle seam and its statevector implementation.

use std::f64::consts::PI;

use qcf_operator::OperatorSpec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ansatz::{qaoa_ansatz, qaoa_num_parameters, two_local_ansatz, two_local_num_parameters};
use crate::circuit::Circuit;
use crate::config::{OptimizerKind, SolverConfig, SolverStrategy};
use crate::error::{OracleError, OracleResult};
use crate::exact;
use crate::optimizers::{Cobyla, OptimizationResult, Optimizer, Spsa};
use crate::statevector::Statevector;

/// Largest register the dense simulator accepts.
pub const MAX_QUBITS: usize = 12;

/// What an oracle call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenResult {
    /// Smallest eigenvalue found.
    pub minimum_energy: f64,
    /// Ansatz parameters at the optimum (empty for `exact`).
    pub optimal_parameters: Vec<f64>,
    /// Objective evaluations spent.
    pub evaluations: usize,
    /// Strategy that produced the result.
    pub strategy: SolverStrategy,
}

/// Computes the minimum eigenvalue of an operator.
///
/// Implementations may be slow and are called at most once at a time per
/// feedback run. Failures are reported, never retried.
pub trait EigenvalueOracle {
    /// Minimum eigenvalue of `operator` under `solver`.
    fn compute_minimum_eigenvalue(
        &self,
        operator: OperatorSpec,
        solver: &SolverConfig,
    ) -> OracleResult<EigenResult>;
}

impl<T: EigenvalueOracle + ?Sized> EigenvalueOracle for &T {
    fn compute_minimum_eigenvalue(
        &self,
        operator: OperatorSpec,
        solver: &SolverConfig,
    ) -> OracleResult<EigenResult> {
        (**self).compute_minimum_eigenvalue(operator, solver)
    }
}

/// In-process oracle backed by the dense statevector simulator.
#[derive(Debug, Clone, Default)]
pub struct StatevectorOracle;

impl StatevectorOracle {
    /// Create a new statevector oracle.
    pub fn new() -> Self {
        Self
    }
}

impl EigenvalueOracle for StatevectorOracle {
    fn compute_minimum_eigenvalue(
        &self,
        operator: OperatorSpec,
        solver: &SolverConfig,
    ) -> OracleResult<EigenResult> {
        solver.validate()?;

        let n_qubits = operator.num_qubits();
        if n_qubits > MAX_QUBITS {
            return Err(OracleError::failure(format!(
                "{n_qubits}-qubit operator exceeds the {MAX_QUBITS}-qubit simulator limit"
            )));
        }

        debug!(
            strategy = %solver.strategy,
            terms = operator.num_terms(),
            qubits = n_qubits,
            "Computing minimum eigenvalue"
        );

        let result = match solver.strategy {
            SolverStrategy::Exact => {
                let energy = exact::minimum_eigenvalue(&operator)?;
                Ok(EigenResult {
                    minimum_energy: energy,
                    optimal_parameters: Vec::new(),
                    evaluations: 1,
                    strategy: SolverStrategy::Exact,
                })
            }
            SolverStrategy::Vqe => {
                let num_params = two_local_num_parameters(n_qubits, solver.ansatz.reps);
                variational(&operator, solver, num_params, |params| {
                    two_local_ansatz(n_qubits, &solver.ansatz, params)
                })
            }
            SolverStrategy::Qaoa => {
                let num_params = qaoa_num_parameters(solver.ansatz.reps);
                variational(&operator, solver, num_params, |params| {
                    qaoa_ansatz(&operator, solver.ansatz.reps, params)
                })
            }
        };

        match &result {
            Ok(r) => debug!(
                energy = r.minimum_energy,
                evaluations = r.evaluations,
                "Oracle call finished"
            ),
            Err(e) => warn!(error = %e, "Oracle call failed"),
        }
        result
    }
}

/// Starting parameters: the configured point, or uniform in `[-π, π)` from the seed.
pub fn initial_point(solver: &SolverConfig, num_params: usize) -> OracleResult<Vec<f64>> {
    match &solver.initial_point {
        Some(point) if point.len() != num_params => Err(OracleError::config(format!(
            "initial point has {} values but the ansatz has {num_params} parameters",
            point.len()
        ))),
        Some(point) => Ok(point.clone()),
        None => {
            let mut rng = StdRng::seed_from_u64(solver.seed);
            Ok((0..num_params).map(|_| rng.gen_range(-PI..PI)).collect())
        }
    }
}

fn variational(
    operator: &OperatorSpec,
    solver: &SolverConfig,
    num_params: usize,
    build: impl Fn(&[f64]) -> Circuit,
) -> OracleResult<EigenResult> {
    let start = initial_point(solver, num_params)?;

    // The objective cannot return an error; keep the first one and bail afterwards.
    let mut failure: Option<OracleError> = None;
    let objective = |params: &[f64]| -> f64 {
        match Statevector::from_circuit(&build(params)) {
            Ok(state) => state.expectation(operator),
            Err(e) => {
                failure.get_or_insert(e);
                f64::INFINITY
            }
        }
    };

    let optimized: OptimizationResult = match solver.optimizer.kind {
        OptimizerKind::Cobyla => Cobyla::new()
            .with_maxiter(solver.optimizer.maxiter)
            .with_tol(solver.optimizer.tol)
            .minimize(objective, start),
        OptimizerKind::Spsa => Spsa::new()
            .with_maxiter(solver.optimizer.maxiter)
            .with_seed(solver.seed)
            .minimize(objective, start),
    };

    if let Some(err) = failure {
        return Err(err);
    }
    if !optimized.optimal_value.is_finite() {
        return Err(OracleError::failure(format!(
            "optimizer returned a non-finite energy ({})",
            optimized.optimal_value
        )));
    }

    Ok(EigenResult {
        minimum_energy: optimized.optimal_value,
        optimal_parameters: optimized.optimal_params,
        evaluations: optimized.num_evaluations,
        strategy: solver.strategy,
    })
}
