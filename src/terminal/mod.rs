//! Terminal rendering: progress bar, spinner, capability lookup and the live display

pub mod capabilities;
pub mod config;
pub mod progress_bar;
pub mod spinner;
pub mod tput;
pub mod ui;

pub use capabilities::CapabilityCache;
pub use config::UiConfig;
pub use progress_bar::{render_bar, ProgressBar};
pub use spinner::Spinner;
pub use tput::{TPut, TermInfo};
pub use ui::{ProgressView, Ui};
