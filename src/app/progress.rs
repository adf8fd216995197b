//! Progress events flowing from the fetcher to the progress display
//!
//! The fetcher owns a [`ProgressReporter`]; the display owns the matching
//! [`ProgressFeed`]. Everything crosses by value. The event side is unbounded
//! so a slow display can never hold up a lookup.

use tokio::sync::{mpsc, oneshot};

/// One completed lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Kind that was looked up
    pub kind: String,
    /// Number of resources found (0 when the lookup failed)
    pub count: usize,
}

impl ProgressEvent {
    pub fn new(kind: impl Into<String>, count: usize) -> Self {
        Self {
            kind: kind.into(),
            count,
        }
    }
}

/// Create a connected reporter/feed pair
pub fn progress_channel() -> (ProgressReporter, ProgressFeed) {
    let (total_tx, total_rx) = oneshot::channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    (
        ProgressReporter {
            total_tx: Some(total_tx),
            events: EventSender(event_tx),
        },
        ProgressFeed { total_rx, event_rx },
    )
}

/// Producer half, held by the fetcher
#[derive(Debug)]
pub struct ProgressReporter {
    total_tx: Option<oneshot::Sender<usize>>,
    events: EventSender,
}

impl ProgressReporter {
    /// Announce how many kinds will be looked up. Only the first call counts.
    pub fn announce_total(&mut self, total: usize) {
        if let Some(tx) = self.total_tx.take() {
            // Nobody listening is fine: the display is optional
            let _ = tx.send(total);
        }
    }

    /// Send one event
    pub fn report(&self, event: ProgressEvent) {
        self.events.send(event);
    }

    /// A cloneable handle for lookup tasks
    pub fn events(&self) -> EventSender {
        self.events.clone()
    }
}

/// Cloneable event sender handed to each lookup
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<ProgressEvent>);

impl EventSender {
    /// Send one event, ignoring a departed display
    pub fn send(&self, event: ProgressEvent) {
        let _ = self.0.send(event);
    }
}

/// Consumer half, held by the progress display
#[derive(Debug)]
pub struct ProgressFeed {
    total_rx: oneshot::Receiver<usize>,
    event_rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressFeed {
    /// Wait for the total. `None` if the reporter went away without one.
    pub async fn total(&mut self) -> Option<usize> {
        (&mut self.total_rx).await.ok()
    }

    /// Next event. `None` once the reporter and every lookup have finished.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.event_rx.recv().await
    }
}
