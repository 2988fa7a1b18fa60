//! Formica CLI - ant colony routing and placement over fog nodes.

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formica")]
#[command(author, version, about = "Formica - ant colony routing and placement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default formica.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Also write an example scenario.json
        #[arg(long)]
        example: bool,
    },

    /// Find a low-latency route between two nodes
    Route {
        /// Scenario file (JSON)
        scenario: String,

        #[command(flatten)]
        solve: SolveArgs,
    },

    /// Place a module chain along the reference track
    Place {
        /// Scenario file (JSON)
        scenario: String,

        #[command(flatten)]
        solve: SolveArgs,
    },

    /// Summarise a scenario without solving it
    Inspect {
        /// Scenario file (JSON)
        scenario: String,
    },
}

/// Flags shared by the solving commands. They override formica.toml.
#[derive(Args, Debug, Clone, Default)]
pub struct SolveArgs {
    /// Seed of the master random generator
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Ants per iteration
    #[arg(short, long)]
    pub ants: Option<usize>,

    /// Number of iterations
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Build ants on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, example } => commands::init::run(path, example),
        Commands::Route { scenario, solve } => commands::route::run(&scenario, &solve, cli.verbose),
        Commands::Place { scenario, solve } => commands::place::run(&scenario, &solve, cli.verbose),
        Commands::Inspect { scenario } => commands::inspect::run(&scenario),
    }
}
