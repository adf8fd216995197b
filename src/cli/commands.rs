//! Command handler for kubectl-fetch
//!
//! [`FetchCommand`] ties one fetch to an optional progress display: the
//! display runs on its own task, is told to stop as soon as the fetch
//! returns and gets a bounded amount of time to restore the terminal before
//! the results are printed.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::{progress_channel, Fetcher, Kubectl, ResourceFetcher, SignalHandler};
use crate::cli::{FetchArgs, GlobalArgs};
use crate::config::AppConfig;
use crate::constants::UI_STOP_TIMEOUT;
use crate::errors::{AppError, Result, TerminalResult};
use crate::terminal::{ProgressView, TPut, Ui};

/// Handle the fetch command
///
/// Loads configuration, wires kubectl, tput and signal handling together and
/// runs one [`FetchCommand`] against the process's stdout and stderr.
pub async fn handle_fetch(global: &GlobalArgs, args: FetchArgs) -> Result<()> {
    let config = AppConfig::load(global.config.clone())
        .await?
        .with_cli_overrides(&args);
    config.validate()?;

    let kubectl = Kubectl::system().with_binary(config.kubectl.binary.clone());
    let fetcher = Fetcher::new(kubectl, config.fetcher_config(args.pattern));
    fetcher.config().validate().map_err(AppError::generic)?;

    let ui_config = config.ui_config();
    ui_config.validate().map_err(AppError::generic)?;
    let interactive = atty::is(atty::Stream::Stdout);
    debug!("stdout is a terminal: {}", interactive);
    let stop_timeout = ui_config.stop_timeout;
    let view = interactive.then(|| Ui::new(TPut::system(), io::stderr(), ui_config));

    let cancel = CancellationToken::new();
    let signals = SignalHandler::new(cancel.clone()).setup();

    let result = FetchCommand::new(fetcher, view, io::stdout(), io::stderr())
        .with_ui_stop_timeout(stop_timeout)
        .run(&cancel)
        .await;

    // Releases the signal listener
    cancel.cancel();
    let _ = signals.await;

    result
}

/// One fetch, its optional display and its output streams
pub struct FetchCommand<F, V, O, E> {
    fetcher: F,
    view: Option<V>,
    stdout: O,
    stderr: E,
    ui_stop_timeout: Duration,
}

impl<F, V, O, E> FetchCommand<F, V, O, E>
where
    F: ResourceFetcher,
    V: ProgressView,
    O: Write,
    E: Write,
{
    /// `view` is `None` when no display should be drawn
    pub fn new(fetcher: F, view: Option<V>, stdout: O, stderr: E) -> Self {
        Self {
            fetcher,
            view,
            stdout,
            stderr,
            ui_stop_timeout: UI_STOP_TIMEOUT,
        }
    }

    pub fn with_ui_stop_timeout(mut self, deadline: Duration) -> Self {
        self.ui_stop_timeout = deadline;
        self
    }

    /// Fetch, stop the display, then print the names.
    ///
    /// A fetch error takes priority over a display that failed to stop. Nothing
    /// is written to stdout unless both succeeded.
    pub async fn run(self, cancel: &CancellationToken) -> Result<()> {
        let Self {
            fetcher,
            view,
            stdout,
            mut stderr,
            ui_stop_timeout,
        } = self;

        let (reporter, feed) = progress_channel();
        let ui_token = cancel.child_token();
        let display = view.map(|view| tokio::spawn(view.run(ui_token.clone(), feed)));

        let fetched = fetcher.fetch(cancel, reporter).await;

        ui_token.cancel();
        let stopped = match display {
            Some(handle) => stop_display(handle, ui_stop_timeout).await,
            None => Ok(()),
        };

        let resources = match (fetched, stopped) {
            (Ok(resources), Ok(())) => resources,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), stopped) => {
                if let Err(timeout) = stopped {
                    warn!("{}", timeout);
                }
                return Err(e.into());
            }
        };

        if resources.is_empty() {
            writeln!(stderr, "No resources found.")?;
            return Ok(());
        }

        info!("Printing {} resources", resources.len());
        let mut out = BufWriter::new(stdout);
        for name in &resources {
            writeln!(out, "{}", name)?;
        }
        out.flush()?;
        Ok(())
    }
}

async fn stop_display(handle: JoinHandle<TerminalResult<()>>, deadline: Duration) -> Result<()> {
    match timeout(deadline, handle).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(e))) => {
            warn!("progress display failed: {}", e);
            Ok(())
        }
        Ok(Err(e)) => {
            warn!("progress display task failed: {}", e);
            Ok(())
        }
        Err(_) => Err(AppError::UiShutdownTimeout {
            millis: deadline.as_millis() as u64,
        }),
    }
}
