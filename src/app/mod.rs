//! Core application logic for kubectl-fetch
//!
//! This module contains the kubectl collaborator, the fetch orchestrator and
//! the progress channel that connects the orchestrator to the display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kubectl_fetch::app::{KubeClient, Kubectl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let kubectl = Kubectl::system();
//! for kind in kubectl.list_kinds(true).await? {
//!     let names = kubectl.get_resources(&kind).await?;
//!     println!("{}: {}", kind, names.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
pub mod kubectl;
pub mod process;
pub mod progress;
pub mod signals;

// Re-export main public API
pub use fetcher::{Fetcher, FetcherConfig, ResourceFetcher};
pub use kubectl::{KubeClient, Kubectl};
pub use process::{CommandOutput, CommandRunner, TokioCommandRunner};
pub use progress::{progress_channel, EventSender, ProgressEvent, ProgressFeed, ProgressReporter};
pub use signals::SignalHandler;
