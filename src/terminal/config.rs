//! Configuration for the progress display

use std::time::Duration;

use crate::constants::ui;

/// Configuration for the progress display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// Preferred bar width in cells (shrunk to fit narrow terminals)
    pub bar_width: usize,
    /// Time between spinner frames
    pub spinner_interval: Duration,
    /// How long the command waits for the display to stop
    pub stop_timeout: Duration,
    /// Color the bar
    pub colors: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bar_width: ui::DEFAULT_BAR_WIDTH,
            spinner_interval: ui::SPINNER_INTERVAL,
            stop_timeout: ui::STOP_TIMEOUT,
            colors: true,
        }
    }
}

impl UiConfig {
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    pub fn with_spinner_interval(mut self, interval: Duration) -> Self {
        self.spinner_interval = interval;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.spinner_interval.is_zero() {
            return Err("Spinner interval cannot be zero".to_string());
        }
        if self.stop_timeout.is_zero() {
            return Err("Display stop timeout cannot be zero".to_string());
        }
        Ok(())
    }
}
