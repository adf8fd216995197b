//! Live progress display
//!
//! [`Ui`] is a single-task state machine. It waits for the total kind count,
//! then redraws a four-line status block on every progress event and every
//! spinner tick until the event stream closes or it is cancelled:
//!
//! ```text
//! Discovering kinds... found 42.
//! ⣽ Fetched kinds: ██████▍    27/42
//! Getting deployments.apps
//! Total resources found:  318
//! ```
//!
//! The block is redrawn in place: the cursor is sent home first and every
//! line is followed by erase-to-end-of-line. All control sequences come from
//! the [`CapabilityCache`]; when one is missing the display still works, it
//! just scrolls.

use std::future::Future;
use std::io::{BufWriter, Write};

use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::capabilities::CapabilityCache;
use super::config::UiConfig;
use super::progress_bar::ProgressBar;
use super::spinner::Spinner;
use super::tput::TermInfo;
use crate::app::progress::{ProgressEvent, ProgressFeed};
use crate::constants::capabilities as caps;
use crate::errors::{TerminalError, TerminalResult};

/// Cells taken by `"<spinner> Fetched kinds: "`
const STATUS_PREFIX_WIDTH: usize = 17;

/// A progress display the command can run while fetching
pub trait ProgressView: Send + 'static {
    /// Run until `feed` is exhausted or `cancel` fires, then restore the terminal
    fn run(
        self,
        cancel: CancellationToken,
        feed: ProgressFeed,
    ) -> impl Future<Output = TerminalResult<()>> + Send + 'static;
}

/// Running counters shown by the display
#[derive(Debug, Default)]
struct FetchStatus {
    total: usize,
    processed: usize,
    resources: usize,
    last_kind: String,
}

impl FetchStatus {
    fn record(&mut self, event: ProgressEvent) {
        self.processed += 1;
        self.resources += event.count;
        self.last_kind = event.kind;
    }
}

/// Terminal progress display
pub struct Ui<T, W: Write> {
    config: UiConfig,
    capabilities: CapabilityCache<T>,
    bar: ProgressBar,
    spinner: Spinner,
    writer: BufWriter<W>,
}

impl<T, W> Ui<T, W>
where
    T: TermInfo,
    W: Write + Send + 'static,
{
    pub fn new(term_info: T, writer: W, config: UiConfig) -> Self {
        Self {
            config,
            capabilities: CapabilityCache::new(term_info),
            bar: ProgressBar::new(),
            spinner: Spinner::new(),
            writer: BufWriter::new(writer),
        }
    }

    /// Run the display. The terminal is restored on every exit path.
    pub async fn start(mut self, cancel: CancellationToken, mut feed: ProgressFeed) -> TerminalResult<()> {
        let rendered = self.render(&cancel, &mut feed).await;
        let restored = self.teardown().await;
        debug!(
            "progress display stopped after {} capability lookups",
            self.capabilities.round_trips()
        );
        rendered.and(restored)
    }

    async fn render(&mut self, cancel: &CancellationToken, feed: &mut ProgressFeed) -> TerminalResult<()> {
        self.tput(caps::HIDE_CURSOR).await?;
        self.tput(caps::ENTER_ALTERNATE_SCREEN).await?;
        write!(self.writer, "Discovering kinds...")?;
        self.writer.flush()?;

        let total = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            total = feed.total() => match total {
                Some(total) => total,
                None => return Ok(()),
            },
        };
        writeln!(self.writer, " found {}.", total)?;
        self.configure_bar(total).await;

        let mut status = FetchStatus {
            total,
            ..Default::default()
        };
        let mut ticker = spinner_ticker(self.config.spinner_interval);

        loop {
            self.draw(&status).await?;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                event = feed.next_event() => match event {
                    Some(event) => {
                        self.bar.increment(1);
                        status.record(event);
                    }
                    None => return Ok(()),
                },
                _ = ticker.tick() => self.spinner.spin(),
            }
        }
    }

    async fn configure_bar(&mut self, total: usize) {
        if self.config.colors {
            let foreground = self.capabilities.query(caps::BAR_FOREGROUND).await;
            let background = self.capabilities.query(caps::BAR_BACKGROUND).await;
            let reset = self.capabilities.query(caps::RESET_ATTRIBUTES).await;
            self.bar
                .set_colors(format!("{}{}", foreground, background), reset);
        }

        let mut width = self.config.bar_width;
        if let Some(columns) = self.capabilities.query_int(caps::COLUMNS).await {
            let digits = total.to_string().len();
            let overhead = STATUS_PREFIX_WIDTH + 1 + digits * 2 + 1;
            let available = usize::try_from(columns).unwrap_or(0).saturating_sub(overhead);
            width = width.min(available);
        }

        self.bar.set_width(width);
        self.bar.set_total_increments(total);
    }

    async fn draw(&mut self, status: &FetchStatus) -> TerminalResult<()> {
        let home = self.capabilities.query(caps::CURSOR_HOME).await;
        let erase = self.capabilities.query(caps::ERASE_LINE).await;
        let digits = status.total.to_string().len();

        let lines = [
            format!("Discovering kinds... found {}.", status.total),
            format!(
                "{} Fetched kinds: {} {:>digits$}/{}",
                self.spinner,
                self.bar,
                status.processed,
                status.total,
                digits = digits
            ),
            format!("Getting {}", status.last_kind),
            format!("Total resources found: {:4}", status.resources),
        ];

        self.writer.write_all(home.as_bytes())?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            write!(self.writer, "{}{}", line, erase)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Every step is attempted; the first failure is reported
    async fn teardown(&mut self) -> TerminalResult<()> {
        let screen = self.tput(caps::EXIT_ALTERNATE_SCREEN).await;
        let cursor = self.tput(caps::SHOW_CURSOR).await;
        let flushed = self.writer.flush().map_err(TerminalError::from);
        screen.and(cursor).and(flushed)
    }

    async fn tput(&mut self, capname: &str) -> TerminalResult<()> {
        let sequence = self.capabilities.query(capname).await;
        self.writer.write_all(sequence.as_bytes())?;
        Ok(())
    }
}

impl<T, W> ProgressView for Ui<T, W>
where
    T: TermInfo,
    W: Write + Send + 'static,
{
    fn run(
        self,
        cancel: CancellationToken,
        feed: ProgressFeed,
    ) -> impl Future<Output = TerminalResult<()>> + Send + 'static {
        self.start(cancel, feed)
    }
}

fn spinner_ticker(period: Duration) -> time::Interval {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
