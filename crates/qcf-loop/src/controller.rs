//! The feedback controller.
//!
//! Each iteration builds the coupled operator for the current coupling
//! parameter, asks the oracle for its minimum eigenvalue, records the pair
//! and applies
//!
//!   coupling' = coupling - learning_rate * energy
//!
//! The rule is applied unconditionally: no clamping, no convergence check.
//! Any error ends the run; the partial trajectory stays readable.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use qcf_operator::{Coefficients, coupled_operator, fixed_operator};
use qcf_oracle::{EigenResult, EigenvalueOracle, SolverConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::LoopConfig;
use crate::error::{LoopError, LoopResult};
use crate::trajectory::{Trajectory, TrajectoryEntry};

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControllerState {
    Idle,
    Running { iteration: usize },
    Completed,
    Failed { iteration: usize },
    Cancelled { iteration: usize },
}

impl ControllerState {
    /// True once the run can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ControllerState::Completed
                | ControllerState::Failed { .. }
                | ControllerState::Cancelled { .. }
        )
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Idle => write!(f, "idle"),
            ControllerState::Running { iteration } => write!(f, "running({iteration})"),
            ControllerState::Completed => write!(f, "completed"),
            ControllerState::Failed { iteration } => write!(f, "failed({iteration})"),
            ControllerState::Cancelled { iteration } => write!(f, "cancelled({iteration})"),
        }
    }
}

/// The coupling parameter and the index of the next iteration to run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackState {
    pub coupling_parameter: f64,
    pub iteration: usize,
}

impl FeedbackState {
    /// State before iteration 0.
    pub fn initial(coupling_init: f64) -> Self {
        Self {
            coupling_parameter: coupling_init,
            iteration: 0,
        }
    }

    /// Apply the update rule after observing `energy`.
    pub fn advance(&self, energy: f64, learning_rate: f64) -> Self {
        Self {
            coupling_parameter: self.coupling_parameter - learning_rate * energy,
            iteration: self.iteration + 1,
        }
    }

    /// The state that followed a recorded entry.
    pub fn resume_from(entry: &TrajectoryEntry, learning_rate: f64) -> Self {
        FeedbackState {
            coupling_parameter: entry.coupling_parameter,
            iteration: entry.iteration,
        }
        .advance(entry.minimum_energy, learning_rate)
    }
}

/// Shared flag checked between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The current iteration still finishes.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type Observer = Box<dyn FnMut(&TrajectoryEntry, &EigenResult) + Send>;

/// Drives the feedback loop against an oracle.
pub struct FeedbackController<O> {
    oracle: O,
    config: LoopConfig,
    state: ControllerState,
    feedback: FeedbackState,
    trajectory: Trajectory,
    cancel: CancellationToken,
    observer: Option<Observer>,
    run_id: Uuid,
    started_at: DateTime<Utc>,
}

impl<O: EigenvalueOracle> FeedbackController<O> {
    /// Create an idle controller. The config is validated here.
    pub fn new(oracle: O, config: LoopConfig) -> LoopResult<Self> {
        config.validate()?;
        let feedback = FeedbackState::initial(config.coupling_init);
        Ok(Self {
            oracle,
            config,
            state: ControllerState::Idle,
            feedback,
            trajectory: Trajectory::new(),
            cancel: CancellationToken::new(),
            observer: None,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        })
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Called after every completed iteration, before the update.
    pub fn on_iteration<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&TrajectoryEntry, &EigenResult) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Coupling parameter and next iteration index.
    pub fn feedback_state(&self) -> FeedbackState {
        self.feedback
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Identifier of the current (or last) run.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the current (or last) run started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// A handle that cancels this controller.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run all iterations from `coupling_init`.
    pub fn run(&mut self) -> LoopResult<&Trajectory> {
        self.resume(FeedbackState::initial(self.config.coupling_init))
    }

    /// Start a fresh run from `state` and continue to the configured
    /// iteration count. The trajectory only holds the iterations run here.
    pub fn resume(&mut self, state: FeedbackState) -> LoopResult<&Trajectory> {
        if state.iteration > self.config.iterations {
            return Err(LoopError::Configuration(format!(
                "cannot resume at iteration {} of a {}-iteration run",
                state.iteration, self.config.iterations
            )));
        }
        self.feedback = state;
        self.trajectory = Trajectory::new();
        self.state = ControllerState::Idle;
        self.run_id = Uuid::new_v4();
        self.started_at = Utc::now();
        self.drive()?;
        Ok(&self.trajectory)
    }

    fn drive(&mut self) -> LoopResult<()> {
        let span = info_span!("feedback_run", run_id = %self.run_id);
        let _enter = span.enter();

        info!(
            iterations = self.config.iterations,
            start = self.feedback.iteration,
            coupling = self.feedback.coupling_parameter,
            learning_rate = self.config.learning_rate,
            "Starting feedback run"
        );

        while self.feedback.iteration < self.config.iterations {
            let iteration = self.feedback.iteration;
            if self.cancel.is_cancelled() {
                self.state = ControllerState::Cancelled { iteration };
                warn!(iteration, "Feedback run cancelled");
                return Err(LoopError::Cancelled { iteration });
            }

            self.state = ControllerState::Running { iteration };
            if let Err(e) = self.step(iteration) {
                self.state = ControllerState::Failed { iteration };
                warn!(iteration, error = %e, "Feedback run failed");
                return Err(e);
            }
        }

        self.state = ControllerState::Completed;
        info!(
            coupling = self.feedback.coupling_parameter,
            recorded = self.trajectory.len(),
            "Feedback run completed"
        );
        Ok(())
    }

    fn step(&mut self, iteration: usize) -> LoopResult<()> {
        let coupling = self.feedback.coupling_parameter;
        let operator = coupled_operator(&self.config.coefficients, coupling)?;
        debug!(iteration, coupling, "Calling oracle");
        let result = self
            .oracle
            .compute_minimum_eigenvalue(operator, &self.config.solver)?;

        let entry = TrajectoryEntry {
            iteration,
            coupling_parameter: coupling,
            minimum_energy: result.minimum_energy,
        };
        self.trajectory.record(entry);
        info!(iteration, coupling, energy = result.minimum_energy, "Iteration complete");

        if let Some(observer) = self.observer.as_mut() {
            observer(&entry, &result);
        }

        self.feedback = self
            .feedback
            .advance(result.minimum_energy, self.config.learning_rate);
        Ok(())
    }
}

/// One oracle call on the fixed-mode operator. No feedback update.
pub fn run_single_shot<O: EigenvalueOracle>(
    oracle: &O,
    coefficients: &Coefficients,
    solver: &SolverConfig,
) -> LoopResult<EigenResult> {
    solver.validate()?;
    let operator = fixed_operator(coefficients)?;
    debug!(strategy = %solver.strategy, "Single-shot oracle call");
    let result = oracle.compute_minimum_eigenvalue(operator, solver)?;
    info!(energy = result.minimum_energy, "Single-shot run completed");
    Ok(result)
}
