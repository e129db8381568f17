//! HEXPLAY CLI - Command-line interface
//!
//! Commands:
//! - simulate: Play a batch of games between two strategies
//! - move: Play one turn for an external game driver

mod move_cmd;
mod simulate;
mod strategy;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexplay")]
#[command(about = "HEXPLAY engine for Dodo and Gopher")]
struct Cli {
    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of games between two strategies
    Simulate(simulate::SimulateArgs),
    /// Choose a move for one turn (JSON in, JSON out)
    Move(move_cmd::MoveArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `move` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Move(args) => move_cmd::run(args, cli.seed),
    }
}
