//! Configuration management for kubectl-fetch
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. Every section and field in the file is optional.
//!
//! ```toml
//! [fetch]
//! max_in_flight = 20
//!
//! [kubectl]
//! binary = "/usr/local/bin/kubectl"
//!
//! [ui]
//! bar_width = 30
//! spinner_interval_ms = 100
//! stop_timeout_ms = 500
//! colors = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::FetcherConfig;
use crate::cli::FetchArgs;
use crate::constants::{config as paths, fetch, kubectl, ui};
use crate::errors::{ConfigError, ConfigResult};
use crate::terminal::UiConfig;

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fetch orchestration settings
    pub fetch: FetchConfigToml,
    /// kubectl invocation settings
    pub kubectl: KubectlConfigToml,
    /// Progress display settings
    pub ui: UiConfigToml,
}

/// TOML-friendly fetch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfigToml {
    /// Maximum number of kinds looked up at the same time
    pub max_in_flight: usize,
}

impl Default for FetchConfigToml {
    fn default() -> Self {
        Self {
            max_in_flight: fetch::DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// TOML-friendly kubectl configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubectlConfigToml {
    /// Program name or path of the kubectl binary
    pub binary: String,
}

impl Default for KubectlConfigToml {
    fn default() -> Self {
        Self {
            binary: kubectl::DEFAULT_BINARY.to_string(),
        }
    }
}

/// TOML-friendly progress display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfigToml {
    /// Preferred bar width in cells
    pub bar_width: usize,
    /// Time between spinner frames in milliseconds
    pub spinner_interval_ms: u64,
    /// How long to wait for the display to stop, in milliseconds
    pub stop_timeout_ms: u64,
    /// Color the progress bar
    pub colors: bool,
}

impl Default for UiConfigToml {
    fn default() -> Self {
        Self {
            bar_width: ui::DEFAULT_BAR_WIDTH,
            spinner_interval_ms: ui::SPINNER_INTERVAL.as_millis() as u64,
            stop_timeout_ms: ui::STOP_TIMEOUT.as_millis() as u64,
            colors: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the explicit file, or the first file found in
    /// the standard locations, falling back to defaults.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(paths::LOCAL_CONFIG_FILE)];
        if let Ok(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(paths::CONFIG_DIR_NAME)
            .join(paths::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.fetch.max_in_flight == 0 {
            return Err(invalid("fetch.max_in_flight", 0, "Must be at least 1"));
        }
        if self.kubectl.binary.trim().is_empty() {
            return Err(invalid("kubectl.binary", "\"\"", "Must not be empty"));
        }
        if self.ui.spinner_interval_ms == 0 {
            return Err(invalid("ui.spinner_interval_ms", 0, "Must be greater than 0"));
        }
        if self.ui.stop_timeout_ms == 0 {
            return Err(invalid("ui.stop_timeout_ms", 0, "Must be greater than 0"));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_cli_overrides(mut self, args: &FetchArgs) -> Self {
        if let Some(parallel) = args.parallel {
            self.fetch.max_in_flight = parallel;
        }
        self
    }

    /// Runtime fetcher configuration
    pub fn fetcher_config(&self, pattern: Option<Regex>) -> FetcherConfig {
        FetcherConfig::default()
            .with_max_in_flight(self.fetch.max_in_flight)
            .with_pattern(pattern)
    }

    /// Runtime display configuration
    pub fn ui_config(&self) -> UiConfig {
        UiConfig::default()
            .with_bar_width(self.ui.bar_width)
            .with_spinner_interval(Duration::from_millis(self.ui.spinner_interval_ms))
            .with_stop_timeout(Duration::from_millis(self.ui.stop_timeout_ms))
            .with_colors(self.ui.colors)
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
