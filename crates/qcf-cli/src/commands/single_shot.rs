//! `min-cost` and `ground-state`: one oracle call on the fixed operator.

use std::path::Path;

use anyhow::{Context, Result};
use qcf_loop::{LoopConfig, RunReport, format_parameters, format_scalar, run_single_shot};
use qcf_operator::fixed_operator;
use qcf_oracle::{EigenResult, SolverConfig, StatevectorOracle};
use tracing::info;

use super::common::{
    SolverArgs, preset_with_env_strategy, print_header, print_result, print_section,
    strategy_title, write_reports,
};

/// The two single-shot entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleShot {
    /// Minimum cost of the fixed operator (QAOA, p = 1).
    MinCost,
    /// Ground-state energy of the fixed operator (VQE, reps = 3).
    GroundState,
}

impl SingleShot {
    pub fn name(&self) -> &'static str {
        match self {
            SingleShot::MinCost => "min-cost",
            SingleShot::GroundState => "ground-state",
        }
    }

    /// Label of the printed result line.
    pub fn label(&self) -> &'static str {
        match self {
            SingleShot::MinCost => "Computed Minimum Cost",
            SingleShot::GroundState => "Computed Ground State Energy",
        }
    }

    pub fn preset(&self) -> SolverConfig {
        match self {
            SingleShot::MinCost => SolverConfig::qaoa_min_cost(),
            SingleShot::GroundState => SolverConfig::vqe_ground_state(),
        }
    }

    /// Preset, then `QCF_STRATEGY`, then command-line flags.
    pub fn solver(&self, config: &LoopConfig, args: &SolverArgs) -> SolverConfig {
        args.apply(preset_with_env_strategy(self.preset(), config))
    }
}

/// Blocking solve; safe to call from a worker thread.
pub fn solve(kind: SingleShot, config: &LoopConfig, solver: &SolverConfig) -> Result<EigenResult> {
    let result = run_single_shot(&StatevectorOracle::new(), &config.coefficients, solver)
        .with_context(|| format!("{} failed", kind.name()))?;
    info!(command = kind.name(), energy = result.minimum_energy, "Single-shot finished");
    Ok(result)
}

/// The two plain result lines.
pub fn print_outcome(kind: SingleShot, result: &EigenResult) {
    println!("{}", format_scalar(kind.label(), result.minimum_energy));
    println!("{}", format_parameters(&result.optimal_parameters));
}

/// Report for a finished single-shot run, recording the solver actually used.
pub fn report(kind: SingleShot, config: &LoopConfig, solver: &SolverConfig, result: EigenResult) -> RunReport {
    let mut config = config.clone();
    config.solver = solver.clone();
    RunReport::single_shot(kind.name(), config, result)
}

/// Execute a single-shot command.
pub async fn execute(
    kind: SingleShot,
    config: LoopConfig,
    args: &SolverArgs,
    output: Option<&Path>,
) -> Result<()> {
    let solver = kind.solver(&config, args);
    solver.validate().context("Invalid solver configuration")?;

    print_header(&format!(
        "{} of the fixed operator ({})",
        match kind {
            SingleShot::MinCost => "Minimum cost",
            SingleShot::GroundState => "Ground-state energy",
        },
        strategy_title(solver.strategy)
    ));
    let operator = fixed_operator(&config.coefficients)?;
    print!("{operator}");
    print_result("Strategy", solver.strategy);
    print_result("Repetitions", solver.ansatz.reps);
    print_result("Evaluation budget", solver.optimizer.maxiter);

    let (config, solver, result) = tokio::task::spawn_blocking(move || {
        let result = solve(kind, &config, &solver);
        (config, solver, result)
    })
    .await
    .context("Solver task panicked")?;
    let result = result?;

    print_section("Result");
    print_outcome(kind, &result);
    print_result("Evaluations", result.evaluations);

    if let Some(path) = output {
        write_reports(path, &[report(kind, &config, &solver, result)])?;
    }
    Ok(())
}
