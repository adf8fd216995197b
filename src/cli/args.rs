//! Command-line argument parsing for kubectl-fetch
//!
//! kubectl-fetch has a single action, so there are no subcommands: global
//! logging/config flags plus the fetch options.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser};
use regex::Regex;

/// kubectl-fetch - list every namespaced resource in the current namespace
#[derive(Parser, Debug)]
#[command(
    name = "kubectl-fetch",
    version,
    about = "List every namespaced resource in the current namespace",
    long_about = "Discovers every namespaced resource kind the cluster serves, looks up \
the objects of each kind concurrently and prints their names, sorted, one per line.
A live progress display is drawn on stderr when stdout is a terminal."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Fetch options
    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Logging and configuration flags
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Options controlling the fetch itself
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Maximum number of kinds looked up at the same time
    #[arg(
        short = 'p',
        long = "parallel",
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub parallel: Option<usize>,

    /// Only fetch kinds whose name matches this regular expression
    #[arg(value_name = "PATTERN", value_parser = parse_pattern)]
    pub pattern: Option<Regex>,
}

fn parse_pattern(value: &str) -> Result<Regex, regex::Error> {
    Regex::new(value)
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}
