//! Bounded-concurrency fetch orchestration
//!
//! The [`Fetcher`] lists the namespaced kinds, then fans one lookup per kind
//! out to spawned tasks while a semaphore keeps at most
//! [`FetcherConfig::max_in_flight`] of them running. Results are funneled
//! back over a channel and aggregated here.
//!
//! # Cancellation
//!
//! Every task shares one [`CancellationToken`], a child of the token passed
//! to [`Fetcher::fetch`]. The first failed lookup trips it and is returned as
//! the only error; an external cancel trips it from above and yields
//! [`FetchError::Cancelled`]. Lookups observe the token at their suspension
//! points, so cancellation is best-effort: a lookup whose kubectl call has
//! already returned still reports, and that report is ignored.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kubectl_fetch::app::{progress_channel, Fetcher, FetcherConfig, Kubectl};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(Kubectl::system(), FetcherConfig::default().with_max_in_flight(4));
//! let (reporter, _feed) = progress_channel();
//!
//! let names = fetcher.fetch(&CancellationToken::new(), reporter).await?;
//! for name in names {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::kubectl::KubeClient;
use crate::app::progress::{EventSender, ProgressEvent, ProgressReporter};
use crate::errors::{FetchError, FetchResult, KubectlResult};

pub use config::FetcherConfig;

/// Something that produces the sorted resource list
pub trait ResourceFetcher: Send + Sync {
    fn fetch(
        &self,
        cancel: &CancellationToken,
        reporter: ProgressReporter,
    ) -> impl Future<Output = FetchResult<Vec<String>>> + Send;
}

/// Result slot of one lookup
#[derive(Debug)]
struct FetchJob {
    kind: String,
    outcome: KubectlResult<Vec<String>>,
}

/// Fans kind lookups out over a kubectl client
pub struct Fetcher<C> {
    client: Arc<C>,
    config: FetcherConfig,
}

impl<C: KubeClient> Fetcher<C> {
    pub fn new(client: C, config: FetcherConfig) -> Self {
        Self::with_shared_client(Arc::new(client), config)
    }

    pub fn with_shared_client(client: Arc<C>, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Enumerate every resource of every (matching) kind.
    ///
    /// The total kind count is announced on `reporter` before the first lookup
    /// starts and one [`ProgressEvent`] is sent per finished lookup.
    ///
    /// # Errors
    ///
    /// [`FetchError::InvalidConfig`] before anything runs, the first failing
    /// collaborator call, or [`FetchError::Cancelled`] when `cancel` fires.
    pub async fn fetch(
        &self,
        cancel: &CancellationToken,
        mut reporter: ProgressReporter,
    ) -> FetchResult<Vec<String>> {
        self.config
            .validate()
            .map_err(|reason| FetchError::InvalidConfig { reason })?;

        let token = cancel.child_token();
        // Whatever way we leave, outstanding lookups are told to stop
        let _stop_lookups = token.clone().drop_guard();

        let kinds = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(FetchError::Cancelled),
            listed = self.client.list_kinds(self.config.namespaced_only) => {
                listed.map_err(|source| FetchError::ListKinds { source })?
            }
        };
        let kinds = self.config.filter_kinds(kinds);
        let expected = kinds.len();

        info!(
            "Fetching resources for {} kinds, {} at a time",
            expected, self.config.max_in_flight
        );
        reporter.announce_total(expected);

        let (results_tx, mut results_rx) = mpsc::channel(expected.max(1));
        self.admit(kinds, token.clone(), reporter.events(), results_tx);

        let mut resources = Vec::new();
        let mut received = 0;
        while received < expected {
            let job = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(FetchError::Cancelled),
                next = results_rx.recv() => match next {
                    Some(job) => job,
                    None => return Err(FetchError::Incomplete { expected, received }),
                },
            };
            received += 1;

            match job.outcome {
                Ok(names) => resources.extend(names),
                Err(source) => {
                    debug!("lookup for {} failed, cancelling the rest", job.kind);
                    token.cancel();
                    return Err(FetchError::GetResources {
                        kind: job.kind,
                        source,
                    });
                }
            }
        }

        resources.sort();
        info!("Found {} resources", resources.len());
        Ok(resources)
    }

    /// Spawn the admission loop: one lookup per kind, gated by the semaphore
    fn admit(
        &self,
        kinds: Vec<String>,
        token: CancellationToken,
        events: EventSender,
        results: mpsc::Sender<FetchJob>,
    ) {
        let permits = self.config.max_in_flight.min(Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            for kind in kinds {
                let permit = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => break,
                    },
                };

                debug!("admitting lookup for {}", kind);
                tokio::spawn(lookup(
                    Arc::clone(&client),
                    kind,
                    permit,
                    token.clone(),
                    events.clone(),
                    results.clone(),
                ));
            }
        });
    }
}

/// Run one lookup and report it
async fn lookup<C: KubeClient>(
    client: Arc<C>,
    kind: String,
    permit: OwnedSemaphorePermit,
    token: CancellationToken,
    events: EventSender,
    results: mpsc::Sender<FetchJob>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("lookup for {} cancelled", kind);
            return;
        }
        outcome = client.get_resources(&kind) => outcome,
    };
    // The slot frees up as soon as the result exists
    drop(permit);

    let count = outcome.as_ref().map_or(0, Vec::len);
    debug!("lookup for {} finished with {} resources", kind, count);
    events.send(ProgressEvent::new(kind.clone(), count));

    // The aggregator may already have returned
    let _ = results.send(FetchJob { kind, outcome }).await;
}

impl<C: KubeClient> ResourceFetcher for Fetcher<C> {
    fn fetch(
        &self,
        cancel: &CancellationToken,
        reporter: ProgressReporter,
    ) -> impl Future<Output = FetchResult<Vec<String>>> + Send {
        Fetcher::fetch(self, cancel, reporter)
    }
}
