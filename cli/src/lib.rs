//! Command-line entry point for dirsweep.

pub mod commands;
pub mod state;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "dirsweep")]
#[command(about = "Enumerate a people directory with adaptive prefix queries")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Crawl a target and append everything found to its result collection
    Crawl {
        /// Target ID (see `dirsweep targets`)
        target: String,

        /// Start from these queries instead of the target's seed set
        #[arg(long = "seed")]
        seeds: Vec<String>,

        /// Pause between queries in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Do not expand truncated queries of this length
        #[arg(long)]
        max_query_len: Option<usize>,
    },

    /// Write a deduplicated copy of a target's result collection
    Filter {
        /// Target ID
        target: String,
    },

    /// List available targets
    Targets,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the built-in filter.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dirsweep=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = state::AppState::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Crawl {
            target,
            seeds,
            delay_ms,
            max_query_len,
        } => {
            let options = commands::crawl::CrawlOptions {
                seeds,
                delay_ms,
                max_query_len,
            };
            let summary = commands::crawl::crawl(&state, &target, options).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Filter { target } => {
            let report = commands::filter::filter(&state, &target).await?;
            println!(
                "{target}: {} records, {} after dedupe",
                report.before, report.after
            );
        }
        Commands::Targets => {
            for summary in commands::targets::list_targets(&state) {
                println!("{summary}");
            }
        }
    }

    Ok(())
}
