//! COBYLA-style derivative-free optimizer.
//!
//! A simplex search whose steps are bounded by a shrinking trust-region
//! radius `rho`, as in COBYLA. `maxiter` is a budget on objective
//! evaluations; a single iteration may overshoot it by at most one simplex
//! rebuild.

use super::{Counted, OptimizationResult, Optimizer};

/// COBYLA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Objective-evaluation budget.
    pub maxiter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation budget.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn simplex_around(
        objective: &mut Counted<impl FnMut(&[f64]) -> f64>,
        base: &[f64],
        f_base: f64,
        step: f64,
    ) -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut simplex = vec![base.to_vec()];
        let mut values = vec![f_base];
        for i in 0..base.len() {
            let mut point = base.to_vec();
            point[i] += step;
            values.push(objective.eval(&point));
            simplex.push(point);
        }
        (simplex, values)
    }
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

impl Optimizer for Cobyla {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut objective = Counted::new(objective);
        let n = initial_params.len();
        let f_start = objective.eval(&initial_params);
        let mut history = vec![f_start];

        if n == 0 {
            return OptimizationResult {
                optimal_params: initial_params,
                optimal_value: f_start,
                num_evaluations: objective.calls(),
                num_iterations: 0,
                history,
                converged: true,
            };
        }

        let (mut simplex, mut f_simplex) =
            Self::simplex_around(&mut objective, &initial_params, f_start, self.rhobeg);

        let mut f_best = f_start;
        let mut rho = self.rhobeg;
        let mut converged = false;
        let mut num_iterations = 0;

        while objective.calls() < self.maxiter {
            num_iterations += 1;

            let mut indices: Vec<usize> = (0..=n).collect();
            indices.sort_by(|&a, &b| f_simplex[a].total_cmp(&f_simplex[b]));

            let best_idx = indices[0];
            let worst_idx = indices[n];

            let spread = f_simplex[worst_idx] - f_simplex[best_idx];
            if spread < self.tol && rho <= self.rhoend {
                converged = true;
                break;
            }

            // Spread collapsed: shrink the trust region and rebuild around the best point.
            if spread < self.tol {
                rho = (rho * 0.5).max(self.rhoend);
                let best = simplex[best_idx].clone();
                let f_best_vertex = f_simplex[best_idx];
                (simplex, f_simplex) =
                    Self::simplex_around(&mut objective, &best, f_best_vertex, rho);
                continue;
            }

            let mut centroid = vec![0.0; n];
            for &idx in &indices[..n] {
                for (c, x) in centroid.iter_mut().zip(&simplex[idx]) {
                    *c += x;
                }
            }
            for val in &mut centroid {
                *val /= n as f64;
            }

            // Reflection, with each coordinate step bounded by rho.
            let reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex[worst_idx])
                .map(|(c, w)| {
                    let diff = c - w;
                    if diff.abs() > rho {
                        c + rho * diff.signum()
                    } else {
                        c + diff
                    }
                })
                .collect();
            let f_reflected = objective.eval(&reflected);

            if f_reflected < f_simplex[best_idx] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = objective.eval(&expanded);

                if f_expanded < f_reflected {
                    simplex[worst_idx] = expanded;
                    f_simplex[worst_idx] = f_expanded;
                } else {
                    simplex[worst_idx] = reflected;
                    f_simplex[worst_idx] = f_reflected;
                }
            } else if f_reflected < f_simplex[indices[n - 1]] {
                simplex[worst_idx] = reflected;
                f_simplex[worst_idx] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex[worst_idx])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = objective.eval(&contracted);

                if f_contracted < f_simplex[worst_idx] {
                    simplex[worst_idx] = contracted;
                    f_simplex[worst_idx] = f_contracted;
                } else {
                    // Shrink toward the best vertex.
                    let best = simplex[best_idx].clone();
                    for i in (0..=n).filter(|&i| i != best_idx) {
                        for (x, b) in simplex[i].iter_mut().zip(&best) {
                            *x = 0.5 * (b + *x);
                        }
                        f_simplex[i] = objective.eval(&simplex[i]);
                    }
                }
            }

            let min_value = f_simplex[argmin(&f_simplex)];
            if min_value < f_best {
                f_best = min_value;
                history.push(f_best);
            }
        }

        let min_idx = argmin(&f_simplex);
        OptimizationResult {
            optimal_params: simplex.swap_remove(min_idx),
            optimal_value: f_simplex[min_idx],
            num_evaluations: objective.calls(),
            num_iterations,
            history,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cobyla_simple() {
        let cobyla = Cobyla::new().with_maxiter(400);

        // Minimize (x-1)^2 + (y-2)^2
        let result = cobyla.minimize(
            |params| {
                let x = params[0];
                let y = params[1];
                (x - 1.0).powi(2) + (y - 2.0).powi(2)
            },
            vec![0.0, 0.0],
        );

        assert!(result.optimal_value < 0.01);
        assert!((result.optimal_params[0] - 1.0).abs() < 0.1);
        assert!((result.optimal_params[1] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cobyla_rosenbrock() {
        let cobyla = Cobyla::new().with_maxiter(1500);

        // Rosenbrock function (minimum at (1, 1))
        let result = cobyla.minimize(
            |params| {
                let x = params[0];
                let y = params[1];
                (1.0 - x).powi(2) + 100.0 * (y - x.powi(2)).powi(2)
            },
            vec![0.0, 0.0],
        );

        // Rosenbrock is hard, just check we improved
        assert!(result.optimal_value < 1.0);
    }

    #[test]
    fn test_budget_respected() {
        let cobyla = Cobyla::new().with_maxiter(20);
        let mut calls = 0;
        let result = cobyla.minimize(
            |p| {
                calls += 1;
                p.iter().map(|x| x.sin()).sum()
            },
            vec![0.3, 0.1, -0.2],
        );
        assert_eq!(result.num_evaluations, calls);
        // One iteration adds at most n + 1 evaluations past the budget.
        assert!(result.num_evaluations <= 20 + 4);
    }

    #[test]
    fn test_zero_parameters() {
        let result = Cobyla::new().minimize(|_| 0.25, Vec::new());
        assert_eq!(result.optimal_value, 0.25);
        assert_eq!(result.num_evaluations, 1);
        assert!(result.converged);
    }

    #[test]
    fn test_history_non_increasing() {
        let result = Cobyla::new()
            .with_maxiter(200)
            .minimize(|p| (p[0] - 0.7).powi(2), vec![-1.0]);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
    }
}
