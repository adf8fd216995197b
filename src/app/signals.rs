//! Signal handling for interrupting a fetch
//!
//! Ctrl-C, SIGTERM and SIGQUIT all trip the root cancellation token, which
//! the fetcher and the progress display both observe.

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels a token when the process is asked to stop
pub struct SignalHandler {
    cancel: CancellationToken,
}

impl SignalHandler {
    /// Create a new signal handler that trips `cancel`
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Install the handlers on a background task.
    ///
    /// The task ends after the first signal, or when the token is cancelled
    /// for another reason.
    pub fn setup(&self) -> JoinHandle<()> {
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ctrl_c() => info!("Received Ctrl+C, cancelling fetch"),
                _ = unix_signal(UnixSignal::Terminate) => info!("Received SIGTERM, cancelling fetch"),
                _ = unix_signal(UnixSignal::Quit) => info!("Received SIGQUIT, cancelling fetch"),
            }

            cancel.cancel();
        })
    }
}

async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Clone, Copy)]
enum UnixSignal {
    Terminate,
    Quit,
}

#[cfg(unix)]
async fn unix_signal(which: UnixSignal) {
    use signal::unix::SignalKind;

    let kind = match which {
        UnixSignal::Terminate => SignalKind::terminate(),
        UnixSignal::Quit => SignalKind::quit(),
    };
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("Failed to install {:?} handler: {}", which, e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn unix_signal(_which: UnixSignal) {
    std::future::pending::<()>().await;
}
