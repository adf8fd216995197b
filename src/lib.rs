//! kubectl-fetch Library
//!
//! Lists every namespaced Kubernetes resource in the current namespace by
//! fanning `kubectl get` out over all resource kinds with bounded
//! concurrency, while an optional terminal display shows live progress.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;
pub mod terminal;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
