//! Command-line interface for vibe-audit
//!
//! Provides `select`, `cache`, and `fingerprint` subcommands over the
//! selection and caching core.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod fingerprint;
mod select;

/// Cache-aware artifact selection for AI-assisted code audits
#[derive(Parser)]
#[command(name = "vibe-audit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which files would be submitted for review, with scores
    Select(select::SelectArgs),

    /// Inspect or modify the analysis result cache
    Cache(cache::CacheArgs),

    /// Print the current project fingerprint
    Fingerprint(fingerprint::FingerprintArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Select(args) => select::run(args),
        Commands::Cache(args) => cache::run(args),
        Commands::Fingerprint(args) => fingerprint::run(args),
    }
}
