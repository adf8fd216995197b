//! kubectl-fetch CLI application
//!
//! Lists every namespaced resource in the current namespace, sorted, one per
//! line, with a live progress display when stdout is a terminal.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use kubectl_fetch::cli::{handle_fetch, Cli};
use kubectl_fetch::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        if e.is_cancellation() {
            info!("Interrupted before the fetch completed");
        } else {
            debug!("Command failed ({} error)", e.category());
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Parse command line arguments; usage errors exit with status 2 here
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("kubectl-fetch v{} starting", env!("CARGO_PKG_VERSION"));

    handle_fetch(&cli.global, cli.fetch).await
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("kubectl_fetch={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    // Logs share stderr with the progress display, never stdout
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
