//! Application constants for kubectl-fetch
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// kubectl invocation constants
pub mod kubectl {
    /// Default kubectl binary, resolved through `PATH`
    pub const DEFAULT_BINARY: &str = "kubectl";

    /// Kinds that are ephemeral event logs and never enumerated
    pub const EVENT_KINDS: &[&str] = &["events", "events.events.k8s.io"];
}

/// Fetch orchestration constants
pub mod fetch {
    /// Default number of concurrent kubectl lookups
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;
}

/// Terminal capability names understood by `tput`
pub mod capabilities {
    /// Helper binary used to resolve capabilities
    pub const TPUT_BINARY: &str = "tput";

    pub const HIDE_CURSOR: &str = "civis";
    pub const SHOW_CURSOR: &str = "cnorm";
    pub const ENTER_ALTERNATE_SCREEN: &str = "smcup";
    pub const EXIT_ALTERNATE_SCREEN: &str = "rmcup";
    pub const CURSOR_HOME: &str = "cup 0 0";
    pub const ERASE_LINE: &str = "el";
    pub const COLUMNS: &str = "cols";

    /// Blue foreground
    pub const BAR_FOREGROUND: &str = "setaf 4";
    /// Black background
    pub const BAR_BACKGROUND: &str = "setab 0";
    pub const RESET_ATTRIBUTES: &str = "sgr0";
}

/// Progress display constants
pub mod ui {
    use super::Duration;

    /// Default progress bar width in cells
    pub const DEFAULT_BAR_WIDTH: usize = 10;

    /// Default spinner frame interval
    pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

    /// How long the command waits for the display to tear down
    pub const STOP_TIMEOUT: Duration = Duration::from_millis(500);
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_CONFIG_FILE: &str = "kubectl-fetch.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "kubectl-fetch";

    /// File name under the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use fetch::DEFAULT_MAX_IN_FLIGHT;
pub use ui::{DEFAULT_BAR_WIDTH, SPINNER_INTERVAL, STOP_TIMEOUT as UI_STOP_TIMEOUT};
