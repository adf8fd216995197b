//! Configuration for the fetch orchestrator

use regex::Regex;

use crate::constants::fetch;

/// Configuration for the fetch orchestrator
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upper bound on concurrently running lookups
    pub max_in_flight: usize,
    /// Only kinds matching this pattern are looked up
    pub pattern: Option<Regex>,
    /// List namespaced kinds (true) or cluster-scoped kinds (false)
    pub namespaced_only: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_in_flight: fetch::DEFAULT_MAX_IN_FLIGHT,
            pattern: None,
            namespaced_only: true,
        }
    }
}

impl FetcherConfig {
    /// Set the concurrency limit
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Restrict lookups to kinds matching `pattern`
    pub fn with_pattern(mut self, pattern: Option<Regex>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_in_flight == 0 {
            return Err("max_in_flight must be at least 1".to_string());
        }
        Ok(())
    }

    /// Keep the kinds the pattern accepts
    pub fn filter_kinds(&self, kinds: Vec<String>) -> Vec<String> {
        match &self.pattern {
            Some(pattern) => kinds
                .into_iter()
                .filter(|kind| pattern.is_match(kind))
                .collect(),
            None => kinds,
        }
    }
}
