//! Per-display cache of terminal control sequences

use std::collections::HashMap;

use tracing::debug;

use super::tput::TermInfo;

/// Memoizes capability lookups so each distinct name costs one round-trip.
///
/// Failed lookups are not cached: they yield `""` and are retried the next
/// time the same name is requested.
#[derive(Debug)]
pub struct CapabilityCache<T> {
    term_info: T,
    cache: HashMap<String, String>,
    round_trips: usize,
}

impl<T: TermInfo> CapabilityCache<T> {
    pub fn new(term_info: T) -> Self {
        Self {
            term_info,
            cache: HashMap::new(),
            round_trips: 0,
        }
    }

    /// Control sequence for `capname`, or `""` when it cannot be resolved
    pub async fn query(&mut self, capname: &str) -> String {
        if let Some(sequence) = self.cache.get(capname) {
            return sequence.clone();
        }

        self.round_trips += 1;
        match self.term_info.query(&[capname]).await {
            Ok(sequence) => {
                self.cache.insert(capname.to_string(), sequence.clone());
                sequence
            }
            Err(e) => {
                debug!("capability {} unavailable: {}", capname, e);
                String::new()
            }
        }
    }

    /// Numeric capability, `None` when absent or not a number
    pub async fn query_int(&mut self, capname: &str) -> Option<i64> {
        self.query(capname).await.parse().ok()
    }

    /// External lookups performed so far
    pub fn round_trips(&self) -> usize {
        self.round_trips
    }
}
