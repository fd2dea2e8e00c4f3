//! Classical optimizers for the variational strategies.

mod cobyla;
mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best objective value after each improving iteration.
    pub history: Vec<f64>,
    /// Whether the optimization converged before the budget ran out.
    pub converged: bool,
}

/// A derivative-free minimizer.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64;
}

/// Objective wrapper that counts calls.
pub(crate) struct Counted<F> {
    objective: F,
    calls: usize,
}

impl<F: FnMut(&[f64]) -> f64> Counted<F> {
    pub(crate) fn new(objective: F) -> Self {
        Self {
            objective,
            calls: 0,
        }
    }

    pub(crate) fn eval(&mut self, params: &[f64]) -> f64 {
        self.calls += 1;
        (self.objective)(params)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}
