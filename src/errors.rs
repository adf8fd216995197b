//! Error types for kubectl-fetch
//!
//! Each component has its own error enum; they roll up into [`AppError`],
//! which is what the binary reports. Exactly one error is ever surfaced to
//! the user, so the `Display` output of every variant is written to read as
//! a single, self-contained line (plus the collaborator's stderr, if any).

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the `kubectl` collaborator
#[derive(Error, Debug)]
pub enum KubectlError {
    /// The kubectl process could not be started
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// kubectl ran but exited with a failure status
    #[error("could not run kubectl command:\n{stderr}")]
    CommandFailed { stderr: String },
}

/// Errors from the terminal capability helper (`tput`)
#[derive(Error, Debug)]
pub enum TerminalError {
    /// tput could not be started or its stdin could not be written
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// tput exited with a failure status
    #[error("tput returned an error (exit code {code:?}): {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    /// A numeric capability did not parse as an integer
    #[error("capability {capname} is not an integer: {value:?}")]
    InvalidInteger {
        capname: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Writing the display failed
    #[error("terminal output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the fetch orchestrator
#[derive(Error, Debug)]
pub enum FetchError {
    /// Listing the namespaced kinds failed
    #[error("could not get namespaced API resources:\n{source}")]
    ListKinds {
        #[source]
        source: KubectlError,
    },

    /// Looking up the resources of one kind failed
    #[error("could not get resources of kind {kind}:\n{source}")]
    GetResources {
        kind: String,
        #[source]
        source: KubectlError,
    },

    /// The fetch was interrupted from outside
    #[error("fetch cancelled")]
    Cancelled,

    /// The fetcher was configured with unusable values
    #[error("invalid fetch configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Lookup tasks went away without reporting (a lookup task panicked)
    #[error("lookups ended early: {received} of {expected} kinds reported")]
    Incomplete { expected: usize, received: usize },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// The user configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The progress display did not stop within its deadline
    #[error("progress display did not stop within {millis}ms: context deadline exceeded")]
    UiShutdownTimeout { millis: u64 },

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether this error comes from an external interrupt rather than a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AppError::Fetch(FetchError::Cancelled))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::Cancelled) => "cancelled",
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::UiShutdownTimeout { .. } => "ui-shutdown",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// kubectl result type alias
pub type KubectlResult<T> = std::result::Result<T, KubectlError>;

/// Terminal result type alias
pub type TerminalResult<T> = std::result::Result<T, TerminalError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
