//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Estimates the gradient from two evaluations along a random ±1 direction.
//! Perturbations are drawn from a seeded RNG so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Counted, OptimizationResult, Optimizer};

/// SPSA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Objective-evaluation budget (three evaluations per iteration).
    pub maxiter: usize,
    /// Initial step size for the update.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Learning rate decay parameter.
    pub alpha: f64,
    /// Perturbation decay parameter.
    pub gamma: f64,
    /// RNG seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            a: 0.2,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create a new SPSA optimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation budget.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Optimizer for Spsa {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut objective = Counted::new(objective);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut x = initial_params;
        let mut best_x = x.clone();
        let mut best_f = objective.eval(&x);
        let mut history = vec![best_f];
        let mut num_iterations = 0;

        if x.is_empty() {
            return OptimizationResult {
                optimal_params: x,
                optimal_value: best_f,
                num_evaluations: objective.calls(),
                num_iterations,
                history,
                converged: true,
            };
        }

        while objective.calls() + 3 <= self.maxiter {
            let k = num_iterations as f64;
            num_iterations += 1;
            let a_k = self.a / (k + 1.0).powf(self.alpha);
            let c_k = self.c / (k + 1.0).powf(self.gamma);

            let delta: Vec<f64> = x
                .iter()
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();

            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();
            let f_plus = objective.eval(&x_plus);
            let f_minus = objective.eval(&x_minus);

            let diff = (f_plus - f_minus) / (2.0 * c_k);
            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi -= a_k * diff / di;
            }

            let f_x = objective.eval(&x);
            if f_x < best_f {
                best_f = f_x;
                best_x.clone_from(&x);
                history.push(best_f);
            }
        }

        OptimizationResult {
            optimal_params: best_x,
            optimal_value: best_f,
            num_evaluations: objective.calls(),
            num_iterations,
            history,
            converged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spsa_simple() {
        let spsa = Spsa::new().with_maxiter(300);

        // Minimize x^2 + y^2
        let result = spsa.minimize(
            |params| params[0].powi(2) + params[1].powi(2),
            vec![1.0, 1.0],
        );

        assert!(result.optimal_value < 0.5);
        assert!(result.num_evaluations <= 300);
    }

    #[test]
    fn test_spsa_reproducible() {
        let run = || {
            Spsa::new()
                .with_maxiter(60)
                .with_seed(7)
                .minimize(|p| (p[0] - 0.3).powi(2) + p[1].cos(), vec![0.0, 0.5])
        };
        let (a, b) = (run(), run());
        assert_eq!(a.optimal_params, b.optimal_params);
        assert_eq!(a.optimal_value, b.optimal_value);
    }

    #[test]
    fn test_spsa_never_worse_than_start() {
        let start = vec![0.2, -0.4];
        let f = |p: &[f64]| p[0].sin() + p[1].cos();
        let f0 = f(&start);
        let result = Spsa::new().with_maxiter(90).minimize(f, start);
        assert!(result.optimal_value <= f0);
    }
}
