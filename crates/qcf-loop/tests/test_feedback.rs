//! Feedback loop behaviour against scripted and real oracles.

use std::cell::Cell;
use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qcf_operator::{Coefficients, OperatorSpec};
use qcf_oracle::{
    EigenResult, EigenvalueOracle, OracleError, OracleResult, SolverConfig, StatevectorOracle,
};
use qcf_loop::{
    CancellationToken, ControllerState, FeedbackController, FeedbackState, LoopConfig, LoopError,
    format_scalar, run_single_shot,
};

/// Returns scripted energies in order; fails once the script is exhausted
/// or at `fail_at`.
struct ScriptedOracle {
    energies: Vec<f64>,
    fail_at: Option<usize>,
    calls: Cell<usize>,
    seen_couplings: Mutex<Vec<f64>>,
}

impl ScriptedOracle {
    fn constant(energy: f64, n: usize) -> Self {
        Self::new(vec![energy; n])
    }

    fn new(energies: Vec<f64>) -> Self {
        Self {
            energies,
            fail_at: None,
            calls: Cell::new(0),
            seen_couplings: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }
}

impl EigenvalueOracle for ScriptedOracle {
    fn compute_minimum_eigenvalue(
        &self,
        operator: OperatorSpec,
        solver: &SolverConfig,
    ) -> OracleResult<EigenResult> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if let Some(term) = operator.coupling_term() {
            self.seen_couplings.lock().unwrap().push(term.coefficient);
        }
        if self.fail_at == Some(call) {
            return Err(OracleError::failure("backend unavailable"));
        }
        let energy = *self
            .energies
            .get(call)
            .ok_or_else(|| OracleError::failure("script exhausted"))?;
        Ok(EigenResult {
            minimum_energy: energy,
            optimal_parameters: vec![0.0; 2],
            evaluations: 1,
            strategy: solver.strategy,
        })
    }
}

fn config(iterations: usize) -> LoopConfig {
    LoopConfig {
        iterations,
        ..LoopConfig::default()
    }
}

#[test]
fn test_scenario_single_shot_line() {
    let oracle = ScriptedOracle::constant(0.8, 1);
    let result = run_single_shot(
        &oracle,
        &Coefficients::default(),
        &SolverConfig::qaoa_min_cost(),
    )
    .unwrap();
    assert_eq!(
        format_scalar("Computed Minimum Cost", result.minimum_energy),
        "Computed Minimum Cost: 0.800000"
    );
    // Fixed mode: no coupling term reached the oracle.
    assert!(oracle.seen_couplings.lock().unwrap().is_empty());
}

#[test]
fn test_scenario_first_update() {
    let mut controller =
        FeedbackController::new(ScriptedOracle::constant(2.0, 10), config(10)).unwrap();
    let trajectory = controller.run().unwrap();
    let first = trajectory.snapshot()[0];
    assert_eq!(first.coupling_parameter, 0.1);
    assert_eq!(first.minimum_energy, 2.0);
    assert_abs_diff_eq!(
        trajectory.snapshot()[1].coupling_parameter,
        0.08,
        epsilon = 1e-12
    );
}

#[test]
fn test_scenario_zero_energy_keeps_coupling() {
    let mut controller =
        FeedbackController::new(ScriptedOracle::constant(0.0, 10), config(10)).unwrap();
    let trajectory = controller.run().unwrap();
    assert_eq!(trajectory.len(), 10);
    assert!(trajectory.coupling_series().iter().all(|&g| g == 0.1));
    assert_eq!(controller.feedback_state().coupling_parameter, 0.1);
}

#[test]
fn test_trajectory_indices_and_oracle_inputs() {
    let energies = vec![1.5, -0.5, 0.25, 3.0, -2.0];
    let oracle = ScriptedOracle::new(energies.clone());
    let mut controller = FeedbackController::new(&oracle, config(5)).unwrap();
    controller.run().unwrap();

    let snapshot = controller.trajectory().snapshot();
    assert_eq!(snapshot.len(), 5);
    for (k, entry) in snapshot.iter().enumerate() {
        assert_eq!(entry.iteration, k);
        assert_eq!(entry.minimum_energy, energies[k]);
    }
    // The recorded coupling is the one the operator was built with.
    assert_eq!(
        *oracle.seen_couplings.lock().unwrap(),
        controller.trajectory().coupling_series()
    );
}

#[test]
fn test_fail_fast() {
    let oracle = ScriptedOracle::constant(1.0, 10).failing_at(3);
    let mut controller = FeedbackController::new(oracle, config(10)).unwrap();
    let err = controller.run().unwrap_err();
    assert!(matches!(err, LoopError::OracleFailure(_)));
    assert_eq!(controller.state(), ControllerState::Failed { iteration: 3 });
    assert_eq!(controller.trajectory().len(), 3);
    assert_eq!(controller.feedback_state().iteration, 3);
}

#[test]
fn test_non_finite_coupling_is_invalid_coefficient() {
    // An infinite energy drives the coupling to -inf; the next build fails.
    let oracle = ScriptedOracle::new(vec![f64::INFINITY, 0.0, 0.0]);
    let mut controller = FeedbackController::new(oracle, config(3)).unwrap();
    let err = controller.run().unwrap_err();
    assert!(matches!(err, LoopError::InvalidCoefficient(_)));
    assert_eq!(controller.state(), ControllerState::Failed { iteration: 1 });
    assert_eq!(controller.trajectory().len(), 1);
}

#[test]
fn test_invalid_coefficients_fail_before_oracle() {
    let mut cfg = config(2);
    cfg.coefficients.c = f64::NAN;
    let mut controller = FeedbackController::new(ScriptedOracle::constant(1.0, 2), cfg).unwrap();
    assert!(matches!(
        controller.run(),
        Err(LoopError::InvalidCoefficient(_))
    ));
    assert_eq!(controller.state(), ControllerState::Failed { iteration: 0 });
    assert!(controller.trajectory().is_empty());
}

#[test]
fn test_cancellation_between_iterations() {
    let token = CancellationToken::new();
    let trip = token.clone();
    let mut controller = FeedbackController::new(ScriptedOracle::constant(1.0, 10), config(10))
        .unwrap()
        .with_cancellation(token)
        .on_iteration(move |entry, _| {
            if entry.iteration == 3 {
                trip.cancel();
            }
        });
    let err = controller.run().unwrap_err();
    assert!(matches!(err, LoopError::Cancelled { iteration: 4 }));
    assert_eq!(controller.state(), ControllerState::Cancelled { iteration: 4 });
    assert_eq!(controller.trajectory().len(), 4);
}

#[test]
fn test_observer_sees_every_iteration() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut controller = FeedbackController::new(ScriptedOracle::constant(0.5, 4), config(4))
        .unwrap()
        .on_iteration(move |entry, result| {
            sink.lock().unwrap().push((entry.iteration, result.minimum_energy));
        });
    controller.run().unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(0, 0.5), (1, 0.5), (2, 0.5), (3, 0.5)]
    );
}

#[test]
fn test_resume_replays_tail() {
    let energies = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut full = FeedbackController::new(ScriptedOracle::new(energies.clone()), config(6)).unwrap();
    full.run().unwrap();
    let entry = full.trajectory().snapshot()[2];

    let state = FeedbackState::resume_from(&entry, 0.01);
    assert_eq!(state.iteration, 3);

    let mut resumed =
        FeedbackController::new(ScriptedOracle::new(energies[3..].to_vec()), config(6)).unwrap();
    resumed.resume(state).unwrap();
    assert_eq!(resumed.trajectory().len(), 3);
    for (a, b) in resumed
        .trajectory()
        .snapshot()
        .iter()
        .zip(&full.trajectory().snapshot()[3..])
    {
        assert_eq!(a.iteration, b.iteration);
        assert_abs_diff_eq!(a.coupling_parameter, b.coupling_parameter, epsilon = 1e-12);
    }
    assert_eq!(resumed.state(), ControllerState::Completed);
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let result = FeedbackController::new(StatevectorOracle::new(), config(0));
    assert!(matches!(result, Err(LoopError::Configuration(_))));
}

#[test]
fn test_zero_budget_is_configuration_error() {
    let mut cfg = config(10);
    cfg.solver.optimizer.maxiter = 0;
    let err = FeedbackController::new(StatevectorOracle::new(), cfg)
        .err()
        .unwrap();
    assert!(matches!(err, LoopError::Configuration(_)), "got {err:?}");
    assert!(!err.to_string().contains("Oracle failure"));
}

#[test]
fn test_single_shot_zero_budget_never_calls_oracle() {
    let oracle = ScriptedOracle::constant(0.8, 1);
    let err = run_single_shot(
        &oracle,
        &Coefficients::default(),
        &SolverConfig::qaoa_min_cost().with_maxiter(0),
    )
    .unwrap_err();
    assert!(matches!(err, LoopError::Configuration(_)), "got {err:?}");
    assert_eq!(oracle.calls.get(), 0);
}

#[test]
fn test_oracle_side_configuration_error_keeps_its_kind() {
    // The initial point length is only known once the operator is built.
    let cfg = LoopConfig {
        iterations: 3,
        solver: SolverConfig::vqe_feedback().with_initial_point(vec![0.0]),
        ..LoopConfig::default()
    };
    let mut controller = FeedbackController::new(StatevectorOracle::new(), cfg).unwrap();
    let err = controller.run().unwrap_err();
    assert!(matches!(err, LoopError::Configuration(_)), "got {err:?}");
    assert_eq!(controller.state(), ControllerState::Failed { iteration: 0 });
    assert!(controller.trajectory().is_empty());
}

#[test]
fn test_exact_feedback_run_matches_closed_form() {
    let cfg = LoopConfig {
        iterations: 4,
        solver: SolverConfig::exact(),
        ..LoopConfig::default()
    };
    let mut controller = FeedbackController::new(StatevectorOracle::new(), cfg).unwrap();
    let trajectory = controller.run().unwrap().clone();
    for entry in trajectory.snapshot() {
        let b = 0.5 + entry.coupling_parameter.abs();
        let expected = 0.2 - (1.0 + b * b + 0.09f64).sqrt();
        assert_abs_diff_eq!(entry.minimum_energy, expected, epsilon = 1e-9);
    }
    // Negative energies push the coupling up.
    let series = trajectory.coupling_series();
    assert!(series.windows(2).all(|w| w[1] > w[0]));
}

proptest! {
    #[test]
    fn prop_update_rule_exact(
        init in -5.0f64..5.0,
        lr in 0.0f64..0.5,
        energies in prop::collection::vec(-10.0f64..10.0, 1..12),
    ) {
        let n = energies.len();
        let cfg = LoopConfig {
            iterations: n,
            coupling_init: init,
            learning_rate: lr,
            ..LoopConfig::default()
        };
        let mut controller = FeedbackController::new(ScriptedOracle::new(energies.clone()), cfg).unwrap();
        controller.run().unwrap();
        let snapshot = controller.trajectory().snapshot();
        prop_assert_eq!(snapshot.len(), n);

        let mut g = init;
        for (k, entry) in snapshot.iter().enumerate() {
            prop_assert_eq!(entry.iteration, k);
            prop_assert!((entry.coupling_parameter - g).abs() < 1e-12);
            g -= lr * energies[k];
        }
        prop_assert!((controller.feedback_state().coupling_parameter - g).abs() < 1e-12);
    }
}
