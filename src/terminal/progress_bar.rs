//! Fixed-width progress bar with eighth-block resolution

use std::fmt;

const FULL_BLOCK: &str = "█";

/// Partial cells, indexed by eighths of a cell. Zero eighths draws nothing.
const PARTIAL_BLOCKS: [&str; 8] = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉"];

/// Render `done/total` as exactly `width` cells.
///
/// `total` is treated as at least 1 and `done` is clamped to `total`.
pub fn render_bar(done: usize, total: usize, width: usize) -> String {
    let total = total.max(1);
    let done = done.min(total);

    let fraction = done as f64 / total as f64;
    let slots = fraction * width as f64;
    let full = (slots.floor() as usize).min(width);
    let eighths = ((slots - full as f64) * PARTIAL_BLOCKS.len() as f64).floor() as usize;
    let partial = PARTIAL_BLOCKS[eighths.min(PARTIAL_BLOCKS.len() - 1)];
    let partial_cells = usize::from(!partial.is_empty());
    let empty = width.saturating_sub(full + partial_cells);

    let mut bar = String::with_capacity(width * FULL_BLOCK.len());
    bar.push_str(&FULL_BLOCK.repeat(full));
    bar.push_str(partial);
    bar.push_str(&" ".repeat(empty));
    bar
}

/// Stateful bar: tracks increments and caches its rendering
#[derive(Debug, Clone)]
pub struct ProgressBar {
    increments: usize,
    total_increments: usize,
    width: usize,
    color: String,
    reset: String,
    rendered: String,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    /// Uncolored bar, 5 cells wide, out of 1 increment
    pub fn new() -> Self {
        Self::with_colors("", "")
    }

    /// Bar wrapped in `color ... reset` control sequences
    pub fn with_colors(color: impl Into<String>, reset: impl Into<String>) -> Self {
        let mut bar = Self {
            increments: 0,
            total_increments: 1,
            width: 5,
            color: color.into(),
            reset: reset.into(),
            rendered: String::new(),
        };
        bar.update_state();
        bar
    }

    /// Advance by `n`, saturating at the total
    pub fn increment(&mut self, n: usize) {
        if self.increments >= self.total_increments {
            return;
        }
        self.increments = self
            .increments
            .saturating_add(n)
            .min(self.total_increments);
        self.update_state();
    }

    pub fn set_total_increments(&mut self, total: usize) {
        self.total_increments = total.max(1);
        self.increments = self.increments.min(self.total_increments);
        self.update_state();
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
        self.update_state();
    }

    pub fn set_colors(&mut self, color: impl Into<String>, reset: impl Into<String>) {
        self.color = color.into();
        self.reset = reset.into();
        self.update_state();
    }

    pub fn increments(&self) -> usize {
        self.increments
    }

    pub fn total_increments(&self) -> usize {
        self.total_increments
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_complete(&self) -> bool {
        self.increments >= self.total_increments
    }

    fn update_state(&mut self) {
        let bar = render_bar(self.increments, self.total_increments, self.width);
        self.rendered = format!("{}{}{}", self.color, bar, self.reset);
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fill level in eighths of a cell
    fn fill(bar: &str) -> usize {
        bar.chars()
            .map(|c| match c {
                '█' => 8,
                ' ' => 0,
                partial => PARTIAL_BLOCKS
                    .iter()
                    .position(|p| p.starts_with(partial))
                    .expect("unknown glyph"),
            })
            .sum()
    }

    #[test]
    fn test_rendering() {
        let cases = [
            (3, 27, 15, "█▋ "),
            (5, 51, 88, "█████"),
            (5, 68, 0, "     "),
            (5, 68, 1, "     "),
            (5, 68, 2, "▏    "),
            (5, 68, 67, "████▉"),
            (5, 68, 68, "█████"),
            (40, 243, 88, "██████████████▍                         "),
        ];

        for (i, (width, total, increments, expected)) in cases.into_iter().enumerate() {
            let mut bar = ProgressBar::new();
            bar.set_width(width);
            bar.set_total_increments(total);
            bar.increment(increments);
            assert_eq!(bar.to_string(), expected, "case #{}", i + 1);
        }
    }

    #[test]
    fn test_increment_saturates() {
        let mut bar = ProgressBar::new();
        bar.set_width(5);
        bar.set_total_increments(5);
        bar.increment(4);
        bar.increment(1);
        let full = bar.to_string();
        bar.increment(1);
        bar.increment(100);

        assert_eq!(full, "█████");
        assert_eq!(bar.to_string(), full);
        assert_eq!(bar.increments(), 5);
        assert!(bar.is_complete());
    }

    #[test]
    fn test_width_is_exact_and_fill_is_monotonic() {
        for width in [0, 1, 7, 10, 33] {
            for total in [1, 3, 8, 68] {
                let mut previous = 0;
                for done in 0..=total {
                    let bar = render_bar(done, total, width);
                    assert_eq!(bar.chars().count(), width, "{}/{} at {}", done, total, width);
                    let level = fill(&bar);
                    assert!(level >= previous, "{}/{} at {} went backwards", done, total, width);
                    previous = level;
                }
                assert_eq!(previous, width * 8);
            }
        }
    }

    #[test]
    fn test_resizing_recomputes_from_current_progress() {
        let mut bar = ProgressBar::new();
        bar.set_total_increments(4);
        bar.increment(2);
        bar.set_width(4);
        assert_eq!(bar.to_string(), "██  ");

        bar.set_total_increments(2);
        assert_eq!(bar.to_string(), "████");

        bar.set_total_increments(1);
        assert_eq!(bar.increments(), 1);
    }

    #[test]
    fn test_zero_total_is_treated_as_one() {
        let mut bar = ProgressBar::new();
        bar.set_total_increments(0);
        assert_eq!(bar.total_increments(), 1);
        assert_eq!(bar.to_string(), "     ");
        assert_eq!(render_bar(0, 0, 3), "   ");
    }

    #[test]
    fn test_colors_wrap_the_bar() {
        let mut bar = ProgressBar::with_colors("<c>", "<r>");
        bar.set_width(2);
        bar.set_total_increments(2);
        bar.increment(1);
        assert_eq!(bar.to_string(), "<c>█ <r>");
    }
}
