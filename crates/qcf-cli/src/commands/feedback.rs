//! `feedback`: the coupling feedback loop.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use qcf_loop::{
    CancellationToken, FeedbackController, LoopConfig, LoopResult, RunOutcome, RunReport,
    TrajectoryEntry, format_scalar,
};
use qcf_oracle::StatevectorOracle;
use tracing::warn;

use super::common::{
    SolverArgs, create_progress_bar, print_header, print_result, print_section, print_success,
    strategy_title, write_reports,
};

/// Loop overrides; applied after the config file and environment.
#[derive(Debug, Clone, Default, Args)]
pub struct FeedbackArgs {
    /// Number of iterations
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Starting coupling parameter
    #[arg(long)]
    pub coupling_init: Option<f64>,

    /// Step size of the coupling update
    #[arg(long)]
    pub learning_rate: Option<f64>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

impl FeedbackArgs {
    pub fn apply(&self, mut config: LoopConfig) -> LoopConfig {
        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if let Some(g) = self.coupling_init {
            config.coupling_init = g;
        }
        if let Some(lr) = self.learning_rate {
            config.learning_rate = lr;
        }
        config.solver = self.solver.apply(config.solver);
        config
    }
}

/// Progress lines for one iteration, numbered from 1.
pub fn iteration_lines(entry: &TrajectoryEntry) -> [String; 2] {
    [
        format!(
            "Iteration {}: Gravity Parameter = {:.4}",
            entry.iteration + 1,
            entry.coupling_parameter
        ),
        format_scalar("Computed Ground State Energy", entry.minimum_energy),
    ]
}

/// Write one iteration to `out` with the progress bar suspended, then
/// advance the bar. The lines reach `out` whether or not the bar is drawn.
pub fn emit_iteration(
    pb: &ProgressBar,
    entry: &TrajectoryEntry,
    out: &mut impl Write,
) -> io::Result<()> {
    pb.suspend(|| -> io::Result<()> {
        for line in iteration_lines(entry) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    })?;
    pb.inc(1);
    Ok(())
}

/// Run the loop on the current thread. The report is returned even when the
/// run stops early, alongside the run's own result.
pub fn run_blocking(
    config: LoopConfig,
    token: CancellationToken,
    progress: Option<ProgressBar>,
) -> Result<(RunReport, LoopResult<()>)> {
    let mut controller = FeedbackController::new(StatevectorOracle::new(), config)
        .context("Invalid feedback configuration")?
        .with_cancellation(token);
    if let Some(pb) = progress {
        controller = controller.on_iteration(move |entry, _| {
            if let Err(e) = emit_iteration(&pb, entry, &mut io::stdout().lock()) {
                warn!(error = %e, "Failed to print iteration");
            }
        });
    }
    let outcome = controller.run().map(|_| ());
    Ok((RunReport::from_controller(&controller), outcome))
}

/// Final summary lines, or nothing if no iteration completed.
pub fn print_final(report: &RunReport) {
    if let RunOutcome::Feedback {
        final_coupling,
        trajectory,
        ..
    } = &report.outcome
    {
        if let Some(last) = trajectory.last() {
            println!("{}", format_scalar("Final Gravity Parameter", *final_coupling));
            println!("{}", format_scalar("Final Ground State Energy", last.minimum_energy));
        }
    }
}

/// Print every recorded iteration after the fact.
pub fn print_trajectory(report: &RunReport) {
    if let RunOutcome::Feedback { trajectory, .. } = &report.outcome {
        for entry in trajectory.snapshot() {
            for line in iteration_lines(entry) {
                println!("{line}");
            }
        }
    }
}

/// Trip `token` on Ctrl-C.
pub fn cancel_on_interrupt(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current iteration");
            token.cancel();
        }
    })
}

/// Execute the feedback command.
pub async fn execute(config: LoopConfig, output: Option<&Path>) -> Result<()> {
    config.validate().context("Invalid feedback configuration")?;

    print_header(&format!(
        "Coupling feedback loop ({})",
        strategy_title(config.solver.strategy)
    ));
    print_result("Iterations", config.iterations);
    print_result("Initial coupling", config.coupling_init);
    print_result("Learning rate", config.learning_rate);
    print_result("Repetitions", config.solver.ansatz.reps);

    let token = CancellationToken::new();
    let watcher = cancel_on_interrupt(token.clone());
    let pb = create_progress_bar(config.iterations as u64, "iterations");
    let task_pb = pb.clone();

    let (report, outcome) =
        tokio::task::spawn_blocking(move || run_blocking(config, token, Some(task_pb)))
            .await
            .context("Feedback task panicked")??;
    watcher.abort();
    pb.finish_and_clear();

    print_section("Result");
    print_final(&report);
    if let Some(path) = output {
        write_reports(path, std::slice::from_ref(&report))?;
    }

    outcome.context("Feedback run stopped early")?;
    print_success("Feedback loop completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> TrajectoryEntry {
        TrajectoryEntry {
            iteration: 2,
            coupling_parameter: 0.1,
            minimum_energy: -0.96619,
        }
    }

    #[test]
    fn test_iteration_lines() {
        let [first, second] = iteration_lines(&entry());
        assert_eq!(first, "Iteration 3: Gravity Parameter = 0.1000");
        assert_eq!(second, "Computed Ground State Energy: -0.966190");
    }

    #[test]
    fn test_hidden_bar_still_prints_iterations() {
        let pb = ProgressBar::hidden();
        let mut out = Vec::new();
        emit_iteration(&pb, &entry(), &mut out).unwrap();
        emit_iteration(&pb, &entry(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Iteration 3: Gravity Parameter = 0.1000").count(), 2);
        assert_eq!(text.matches("Computed Ground State Energy: -0.966190").count(), 2);
        assert_eq!(pb.position(), 2);
    }

    #[test]
    fn test_visible_bar_writes_to_output() {
        let pb = ProgressBar::new(3);
        let mut out = Vec::new();
        emit_iteration(&pb, &entry(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Iteration 3: Gravity Parameter = 0.1000\nComputed Ground State Energy: -0.966190\n"
        );
        assert_eq!(pb.position(), 1);
    }

    #[test]
    fn test_run_blocking_reports_partial_trajectory() {
        let config = LoopConfig {
            iterations: 3,
            solver: qcf_oracle::SolverConfig::exact(),
            ..LoopConfig::default()
        };
        let token = CancellationToken::new();
        token.cancel();
        let (report, outcome) = run_blocking(config, token, Some(ProgressBar::hidden())).unwrap();
        assert!(outcome.is_err());
        match report.outcome {
            RunOutcome::Feedback { trajectory, .. } => assert!(trajectory.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
