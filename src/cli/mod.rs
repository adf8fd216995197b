//! Command-line interface components
//!
//! Argument parsing and the command handler that drives a fetch and its
//! progress display.

pub mod args;
pub mod commands;

pub use args::{Cli, FetchArgs, GlobalArgs};
pub use commands::{handle_fetch, FetchCommand};
