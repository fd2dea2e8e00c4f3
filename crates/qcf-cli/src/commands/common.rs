//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qcf_loop::{LoopConfig, RunReport};
use qcf_oracle::{OptimizerKind, SolverConfig, SolverStrategy};

/// Solver overrides accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct SolverArgs {
    /// Solving strategy (exact, vqe, qaoa)
    #[arg(long)]
    pub strategy: Option<SolverStrategy>,

    /// Classical optimizer (cobyla, spsa)
    #[arg(long)]
    pub optimizer: Option<OptimizerKind>,

    /// Ansatz repetitions
    #[arg(long)]
    pub reps: Option<usize>,

    /// Objective-evaluation budget
    #[arg(long)]
    pub maxiter: Option<usize>,

    /// RNG seed for the initial point and SPSA
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SolverArgs {
    /// Apply the flags that were given on top of `solver`.
    pub fn apply(&self, mut solver: SolverConfig) -> SolverConfig {
        if let Some(strategy) = self.strategy {
            solver = solver.with_strategy(strategy);
        }
        if let Some(kind) = self.optimizer {
            solver = solver.with_optimizer(kind);
        }
        if let Some(reps) = self.reps {
            solver = solver.with_reps(reps);
        }
        if let Some(maxiter) = self.maxiter {
            solver = solver.with_maxiter(maxiter);
        }
        if let Some(seed) = self.seed {
            solver = solver.with_seed(seed);
        }
        solver
    }
}

/// Load the loop configuration: file (if any), then `QCF_*` environment.
pub fn load_config(path: Option<&Path>) -> Result<LoopConfig> {
    LoopConfig::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Invalid configuration".to_string(),
    })
}

/// Preset for a command, honouring `QCF_STRATEGY` when it was set.
pub fn preset_with_env_strategy(preset: SolverConfig, config: &LoopConfig) -> SolverConfig {
    if std::env::var_os(qcf_loop::config::ENV_STRATEGY).is_some() {
        preset.with_strategy(config.solver.strategy)
    } else {
        preset
    }
}

/// Write one or more reports as JSON.
pub fn write_reports(path: &Path, reports: &[RunReport]) -> Result<()> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    print_info(&format!("Report written to {}", style(path.display()).green()));
    Ok(())
}

/// Strategy label for headers.
pub fn strategy_title(strategy: SolverStrategy) -> &'static str {
    match strategy {
        SolverStrategy::Exact => "Exact diagonalization",
        SolverStrategy::Vqe => "VQE",
        SolverStrategy::Qaoa => "QAOA",
    }
}

/// Create a progress bar for the feedback loop.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a command header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a section title.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a dimmed key/value line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}
