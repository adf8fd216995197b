//! Unit tests for the fetch orchestrator
//!
//! All tests drive the fetcher with an in-memory [`KubeClient`] that records
//! which kinds were looked up and how many lookups ran at the same time.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::Regex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::app::kubectl::KubeClient;
use crate::app::progress::{progress_channel, ProgressEvent};
use crate::errors::{FetchError, KubectlError, KubectlResult};

use super::*;

/// In-memory cluster
#[derive(Default)]
struct MockKubeClient {
    kinds: Vec<String>,
    list_error: Option<String>,
    resources: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    running: AtomicUsize,
    peak: AtomicUsize,
    lookups: Mutex<Vec<String>>,
}

impl MockKubeClient {
    fn with_kinds(kinds: &[&str]) -> Self {
        Self {
            kinds: kinds.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    fn resources(mut self, kind: &str, names: &[&str]) -> Self {
        self.resources.insert(
            kind.to_string(),
            names.iter().map(|n| n.to_string()).collect(),
        );
        self
    }

    fn failing(mut self, kind: &str) -> Self {
        self.failing.insert(kind.to_string());
        self
    }

    fn delay(mut self, kind: &str, delay: Duration) -> Self {
        self.delays.insert(kind.to_string(), delay);
        self
    }

    fn looked_up(&self) -> Vec<String> {
        let mut lookups = self.lookups.lock().unwrap().clone();
        lookups.sort();
        lookups
    }
}

impl KubeClient for MockKubeClient {
    async fn list_kinds(&self, _namespaced_only: bool) -> KubectlResult<Vec<String>> {
        match &self.list_error {
            Some(stderr) => Err(KubectlError::CommandFailed {
                stderr: stderr.clone(),
            }),
            None => Ok(self.kinds.clone()),
        }
    }

    async fn get_resources(&self, kind: &str) -> KubectlResult<Vec<String>> {
        self.lookups.lock().unwrap().push(kind.to_string());
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let delay = self
            .delays
            .get(kind)
            .copied()
            .unwrap_or(self.default_delay);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(kind) {
            return Err(KubectlError::CommandFailed {
                stderr: "error getting resources".to_string(),
            });
        }
        Ok(self.resources.get(kind).cloned().unwrap_or_default())
    }
}

fn fetcher_for(client: &Arc<MockKubeClient>, config: FetcherConfig) -> Fetcher<MockKubeClient> {
    Fetcher::with_shared_client(Arc::clone(client), config)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Returns every resource of the matching kinds, sorted
#[tokio::test]
async fn test_fetch_filters_and_sorts() {
    let client = Arc::new(
        // returns the list unsorted
        MockKubeClient::with_kinds(&["service", "deployment", "configmap"])
            .resources("deployment", &["deployment/foo"])
            .resources("service", &["service/bar", "service/baz"]),
    );
    let config = FetcherConfig::default()
        .with_pattern(Some(Regex::new("(deployment|service)").unwrap()));
    let fetcher = fetcher_for(&client, config);
    let (reporter, mut feed) = progress_channel();

    let resources = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    assert_eq!(
        resources,
        strings(&["deployment/foo", "service/bar", "service/baz"])
    );
    assert_eq!(client.looked_up(), strings(&["deployment", "service"]));
    assert_eq!(feed.total().await, Some(2));
}

/// Completion order does not affect the result order
#[tokio::test]
async fn test_fetch_sorts_regardless_of_completion_order() {
    let client = Arc::new(
        MockKubeClient::with_kinds(&["a", "b"])
            .resources("a", &["a/2", "a/1"])
            .resources("b", &["b/3", "b/1", "b/2"])
            .delay("a", Duration::from_millis(30)),
    );
    let fetcher = fetcher_for(&client, FetcherConfig::default().with_max_in_flight(2));
    let (reporter, _feed) = progress_channel();

    let resources = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    assert_eq!(resources, strings(&["a/1", "a/2", "b/1", "b/2", "b/3"]));
}

/// One event per kind, failures count as zero
#[tokio::test]
async fn test_fetch_emits_one_event_per_kind() {
    let client = Arc::new(
        MockKubeClient::with_kinds(&["pods", "secrets"])
            .resources("pods", &["pod/a", "pod/b", "pod/c"]),
    );
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, mut feed) = progress_channel();

    fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    let mut events = vec![
        feed.next_event().await.unwrap(),
        feed.next_event().await.unwrap(),
    ];
    events.sort_by(|a, b| a.kind.cmp(&b.kind));
    assert_eq!(
        events,
        vec![
            ProgressEvent::new("pods", 3),
            ProgressEvent::new("secrets", 0)
        ]
    );
}

/// Listing kinds failing is reported with context
#[tokio::test]
async fn test_fetch_list_kinds_error() {
    let client = Arc::new(MockKubeClient {
        list_error: Some("error getting api resources".to_string()),
        ..Default::default()
    });
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, mut feed) = progress_channel();

    let error = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::ListKinds { .. }));
    assert!(error.to_string().contains("error getting api resources"));
    assert!(client.looked_up().is_empty());
    assert_eq!(feed.total().await, None);
}

/// A failing lookup fails the whole fetch
#[tokio::test]
async fn test_fetch_get_resources_error() {
    let client = Arc::new(
        MockKubeClient::with_kinds(&["service", "deployment", "configmap"]).failing("service"),
    );
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, _feed) = progress_channel();

    let error = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap_err();

    match &error {
        FetchError::GetResources { kind, .. } => assert_eq!(kind, "service"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("error getting resources"));
}

/// Only the first failure is reported and the fetch does not wait for the rest
#[tokio::test]
async fn test_fetch_first_error_wins_without_waiting() {
    let client = Arc::new(
        MockKubeClient::with_kinds(&["fast", "late", "slow"])
            .failing("fast")
            .failing("late")
            .delay("late", Duration::from_millis(200))
            .delay("slow", Duration::from_secs(30)),
    );
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, _feed) = progress_channel();

    let result = timeout(
        Duration::from_secs(5),
        fetcher.fetch(&CancellationToken::new(), reporter),
    )
    .await
    .expect("fetch should not wait for the slow lookup");

    match result {
        Err(FetchError::GetResources { kind, .. }) => assert_eq!(kind, "fast"),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Admission never lets more than max_in_flight lookups run together
#[tokio::test]
async fn test_fetch_bounds_concurrency() {
    let kinds: Vec<String> = (0..20).map(|i| format!("kind{:02}", i)).collect();
    let client = Arc::new(MockKubeClient {
        kinds: kinds.clone(),
        default_delay: Duration::from_millis(10),
        ..Default::default()
    });
    let fetcher = fetcher_for(&client, FetcherConfig::default().with_max_in_flight(3));
    let (reporter, _feed) = progress_channel();

    fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    let peak = client.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency was {}", peak);
    assert!(peak >= 1);
    assert_eq!(client.looked_up(), kinds);
}

/// A single slot serializes every lookup
#[tokio::test]
async fn test_fetch_with_single_slot() {
    let client = Arc::new(MockKubeClient {
        kinds: strings(&["a", "b", "c", "d"]),
        default_delay: Duration::from_millis(5),
        ..Default::default()
    });
    let fetcher = fetcher_for(&client, FetcherConfig::default().with_max_in_flight(1));
    let (reporter, _feed) = progress_channel();

    fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    assert_eq!(client.peak.load(Ordering::SeqCst), 1);
}

/// No kinds is an empty, successful fetch
#[tokio::test]
async fn test_fetch_no_kinds() {
    let client = Arc::new(MockKubeClient::default());
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, mut feed) = progress_channel();

    let resources = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    assert!(resources.is_empty());
    assert_eq!(feed.total().await, Some(0));
    assert_eq!(feed.next_event().await, None);
}

/// Cancelled before anything happened
#[tokio::test]
async fn test_fetch_cancelled_up_front() {
    let client = Arc::new(MockKubeClient::with_kinds(&["pods"]));
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, _feed) = progress_channel();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = fetcher.fetch(&cancel, reporter).await.unwrap_err();

    assert!(matches!(error, FetchError::Cancelled));
    assert!(client.looked_up().is_empty());
}

/// Cancelled while lookups are in flight
#[tokio::test]
async fn test_fetch_cancelled_mid_flight() {
    let client = Arc::new(MockKubeClient {
        kinds: strings(&["a", "b"]),
        default_delay: Duration::from_secs(30),
        ..Default::default()
    });
    let fetcher = fetcher_for(&client, FetcherConfig::default());
    let (reporter, _feed) = progress_channel();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = timeout(Duration::from_secs(5), fetcher.fetch(&cancel, reporter))
        .await
        .expect("cancellation should end the fetch promptly");

    assert!(matches!(result, Err(FetchError::Cancelled)));
}

/// A concurrency limit beyond what a semaphore can hold still runs everything
#[tokio::test]
async fn test_fetch_with_huge_in_flight_limit() {
    let client = Arc::new(
        MockKubeClient::with_kinds(&["deployment", "service"])
            .resources("deployment", &["deployment/foo"])
            .resources("service", &["service/bar"]),
    );
    let config = FetcherConfig::default().with_max_in_flight(usize::MAX);
    let fetcher = fetcher_for(&client, config);
    let (reporter, mut feed) = progress_channel();

    let resources = fetcher
        .fetch(&CancellationToken::new(), reporter)
        .await
        .unwrap();

    assert_eq!(resources, strings(&["deployment/foo", "service/bar"]));
    assert_eq!(feed.total().await, Some(2));
}

/// A zero concurrency limit is rejected instead of waiting forever
#[tokio::test]
async fn test_fetch_rejects_zero_in_flight() {
    let client = Arc::new(MockKubeClient::with_kinds(&["deployment"]));
    let fetcher = fetcher_for(&client, FetcherConfig::default().with_max_in_flight(0));
    let (reporter, mut feed) = progress_channel();

    let result = timeout(
        Duration::from_secs(5),
        fetcher.fetch(&CancellationToken::new(), reporter),
    )
    .await
    .expect("an invalid limit should fail immediately");

    assert!(matches!(result, Err(FetchError::InvalidConfig { .. })));
    assert_eq!(feed.total().await, None);
    assert!(client.looked_up().is_empty());
}
