//! Result lines and exportable run reports.

use chrono::{DateTime, Utc};
use qcf_oracle::{EigenResult, EigenvalueOracle};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LoopConfig;
use crate::controller::{ControllerState, FeedbackController};
use crate::trajectory::Trajectory;

/// `"<label>: <value>"` with six decimals.
pub fn format_scalar(label: &str, value: f64) -> String {
    format!("{label}: {value:.6}")
}

/// `"Optimized Parameters: [p0, p1, ...]"`.
pub fn format_parameters(params: &[f64]) -> String {
    let joined = params
        .iter()
        .map(|p| format!("{p:.6}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Optimized Parameters: [{joined}]")
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A single oracle call on the fixed operator.
    SingleShot { label: String, result: EigenResult },
    /// A feedback run, possibly partial.
    Feedback {
        state: ControllerState,
        final_coupling: f64,
        trajectory: Trajectory,
    },
}

/// Machine-readable record of one run, for external plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub config: LoopConfig,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>, config: LoopConfig, outcome: RunOutcome) -> Self {
        Self {
            run_id,
            started_at,
            config,
            outcome,
        }
    }

    /// Report for a single oracle call, stamped now.
    pub fn single_shot(label: impl Into<String>, config: LoopConfig, result: EigenResult) -> Self {
        Self::new(
            Uuid::new_v4(),
            Utc::now(),
            config,
            RunOutcome::SingleShot {
                label: label.into(),
                result,
            },
        )
    }

    /// Report for the controller's current (or last) run, complete or not.
    pub fn from_controller<O: EigenvalueOracle>(controller: &FeedbackController<O>) -> Self {
        Self::new(
            controller.run_id(),
            controller.started_at(),
            controller.config().clone(),
            RunOutcome::Feedback {
                state: controller.state(),
                final_coupling: controller.feedback_state().coupling_parameter,
                trajectory: controller.trajectory().clone(),
            },
        )
    }
}
