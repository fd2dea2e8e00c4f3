//! Coupling feedback command-line interface (`qcf`).
//!
//! Runs the fixed-operator minimum-cost and ground-state solves and the
//! coupling feedback loop against the statevector oracle.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{SolverArgs, load_config};
use commands::feedback::FeedbackArgs;
use commands::single_shot::SingleShot;
use commands::{all, feedback, single_shot};

/// Coupling feedback between a fixed operator and its minimum eigenvalue
#[derive(Parser)]
#[command(name = "qcf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Loop configuration file (YAML or JSON)
    #[arg(short, long, global = true, env = "QCF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Minimum cost of the fixed operator (QAOA)
    MinCost {
        #[command(flatten)]
        solver: SolverArgs,

        /// Write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ground-state energy of the fixed operator (VQE)
    GroundState {
        #[command(flatten)]
        solver: SolverArgs,

        /// Write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Iterate the coupling parameter against the ground-state energy
    Feedback {
        #[command(flatten)]
        args: FeedbackArgs,

        /// Write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run all three entry points concurrently
    All {
        #[command(flatten)]
        solver: SolverArgs,

        /// Write the JSON reports (as an array) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::MinCost { solver, output } => {
            single_shot::execute(SingleShot::MinCost, config, &solver, output.as_deref()).await
        }
        Commands::GroundState { solver, output } => {
            single_shot::execute(SingleShot::GroundState, config, &solver, output.as_deref()).await
        }
        Commands::Feedback { args, output } => {
            feedback::execute(args.apply(config), output.as_deref()).await
        }
        Commands::All { solver, output } => all::execute(config, &solver, output.as_deref()).await,
    }
}
