//! # snapcheck CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use snapcheck_cli::assert::{run_check, run_compare, run_equal, AssertArgs, CompareArgs};
use snapcheck_cli::snapshot::{run_create, run_get, run_inspect, CreateArgs, GetArgs, InspectArgs};
use snapcheck_cli::GlobalOpts;

/// snapcheck: structural snapshots for test data
///
/// Stores documents as versioned snapshots with an inferred schema and an
/// integrity hash, then checks later documents against them.
#[derive(Parser, Debug)]
#[command(name = "snapcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a document as a snapshot version, overwriting any existing one.
    Create(CreateArgs),

    /// Read a snapshot, creating it from --input if absent or expired.
    Get(GetArgs),

    /// Assert a document conforms to a stored snapshot's schema.
    Check(AssertArgs),

    /// Assert a document equals a stored snapshot's value.
    Equal(AssertArgs),

    /// Compare the stored values of two versions.
    Compare(CompareArgs),

    /// Print a stored snapshot record.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("snapcheck v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Create(args) => run_create(args, &cli.global),
        Commands::Get(args) => run_get(args, &cli.global),
        Commands::Check(args) => run_check(args, &cli.global),
        Commands::Equal(args) => run_equal(args, &cli.global),
        Commands::Compare(args) => run_compare(args, &cli.global),
        Commands::Inspect(args) => run_inspect(args, &cli.global),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
