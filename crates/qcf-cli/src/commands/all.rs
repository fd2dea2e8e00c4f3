//! `all`: both single-shot entry points and the feedback loop, run
//! concurrently and reported in a fixed order.

use std::path::Path;

use anyhow::{Context, Result};
use qcf_loop::{CancellationToken, LoopConfig};
use tracing::info;

use super::common::{SolverArgs, print_header, print_section, print_success, write_reports};
use super::feedback::{cancel_on_interrupt, print_final, print_trajectory, run_blocking};
use super::single_shot::{SingleShot, print_outcome, report, solve};

/// Execute every entry point. Single-shot solvers come from their presets
/// (plus `args`); the loop uses `config` as loaded.
pub async fn execute(config: LoopConfig, args: &SolverArgs, output: Option<&Path>) -> Result<()> {
    config.validate().context("Invalid feedback configuration")?;

    let min_cost = SingleShot::MinCost.solver(&config, args);
    let ground_state = SingleShot::GroundState.solver(&config, args);
    min_cost.validate().context("Invalid min-cost solver")?;
    ground_state.validate().context("Invalid ground-state solver")?;

    print_header("Coupling feedback: all entry points");
    info!("Running min-cost, ground-state and feedback concurrently");

    let token = CancellationToken::new();
    let watcher = cancel_on_interrupt(token.clone());

    let single = |kind: SingleShot, solver: qcf_oracle::SolverConfig| {
        let config = config.clone();
        tokio::task::spawn_blocking(move || -> Result<_> {
            let result = solve(kind, &config, &solver)?;
            Ok(report(kind, &config, &solver, result))
        })
    };
    let min_cost_task = single(SingleShot::MinCost, min_cost);
    let ground_state_task = single(SingleShot::GroundState, ground_state);
    let feedback_config = config.clone();
    let feedback_task =
        tokio::task::spawn_blocking(move || run_blocking(feedback_config, token, None));

    let (min_cost, ground_state, feedback) =
        tokio::try_join!(min_cost_task, ground_state_task, feedback_task)
            .context("Worker task panicked")?;
    watcher.abort();

    let min_cost = min_cost?;
    let ground_state = ground_state?;
    let (feedback, outcome) = feedback?;

    for (kind, report) in [
        (SingleShot::MinCost, &min_cost),
        (SingleShot::GroundState, &ground_state),
    ] {
        print_section(kind.name());
        if let qcf_loop::RunOutcome::SingleShot { result, .. } = &report.outcome {
            print_outcome(kind, result);
        }
    }

    print_section("feedback");
    print_trajectory(&feedback);
    print_final(&feedback);

    if let Some(path) = output {
        write_reports(path, &[min_cost, ground_state, feedback])?;
    }

    outcome.context("Feedback run stopped early")?;
    print_success("All entry points completed");
    Ok(())
}
