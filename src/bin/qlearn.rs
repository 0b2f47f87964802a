//! qlearn CLI - Train and compare tabular Q-learning policies

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qlearn")]
#[command(version, about = "Tabular Q-learning trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning policy on the built-in gridworld
    Train(qlearn::cli::commands::train::TrainArgs),

    /// Compare Q-learning against the random baseline
    Compare(qlearn::cli::commands::compare::CompareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qlearn::cli::commands::train::execute(args),
        Commands::Compare(args) => qlearn::cli::commands::compare::execute(args),
    }
}
