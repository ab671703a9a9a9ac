//! tdgrid CLI - tabular TD learning on grid environments
//!
//! This CLI provides a unified interface for:
//! - Training Q-learning, SARSA, and Boltzmann agents
//! - Evaluating the learned greedy policies
//! - Exporting learning curves and step snapshots

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdgrid")]
#[command(version, about = "Tabular TD learning on grid environments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train one or more agents, evaluate them, and print their policies
    Train(tdgrid::cli::commands::train::TrainArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tdgrid::cli::commands::train::execute(args),
    }
}
