//! Braille spinner

use std::fmt;

/// Spinner frames, one step per tick
const SPINNER_ICONS: [&str; 8] = ["⢿", "⣻", "⣽", "⣾", "⣷", "⣯", "⣟", "⡿"];

/// A terminal spinner. It never advances by itself; the owner calls
/// [`Spinner::spin`] on each timer tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spinner {
    state: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame
    pub fn spin(&mut self) {
        self.state = (self.state + 1) % SPINNER_ICONS.len();
    }

    /// Current frame
    pub fn icon(&self) -> &'static str {
        SPINNER_ICONS[self.state]
    }
}

impl fmt::Display for Spinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.icon())
    }
}
