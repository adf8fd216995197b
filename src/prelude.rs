//! Prelude module for the kubectl-fetch library
//!
//! Re-exports the items needed to embed a fetch in another program with a
//! single `use kubectl_fetch::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use kubectl_fetch::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = Fetcher::new(Kubectl::system(), FetcherConfig::default());
//!     let (reporter, _feed) = progress_channel();
//!
//!     let names = fetcher.fetch(&CancellationToken::new(), reporter).await?;
//!     println!("{} resources", names.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FetchError, Result};

// Fetch orchestration
pub use crate::app::{
    progress_channel, Fetcher, FetcherConfig, KubeClient, Kubectl, ProgressEvent, ProgressFeed,
    ProgressReporter, ResourceFetcher,
};

// Display
pub use crate::terminal::{ProgressView, TPut, Ui, UiConfig};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_MAX_IN_FLIGHT, UI_STOP_TIMEOUT};

// Cancellation is part of every fetch signature
pub use tokio_util::sync::CancellationToken;
