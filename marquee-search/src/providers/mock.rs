//! Mock provider implementation for testing.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use marquee_core::MovieRecord;
use parking_lot::Mutex;

use super::MetadataProvider;
use crate::errors::SearchError;

/// A request observed by [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// Default popular list
    Discover,
    /// Query-scoped search
    Search(String),
}

/// Scripted provider recording every call it receives.
///
/// Results are keyed by query; the empty key answers `discover_popular`.
/// Unknown queries return an empty list.
#[derive(Debug, Default)]
pub struct MockProvider {
    results: HashMap<String, Vec<MovieRecord>>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    fail_all: bool,
    calls: Mutex<Vec<ProviderCall>>,
}

impl MockProvider {
    /// Creates a mock with no scripted results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the results for a query ("" for the popular list).
    pub fn with_results(mut self, query: &str, movies: Vec<MovieRecord>) -> Self {
        self.results.insert(query.to_string(), movies);
        self
    }

    /// Delays the answer for a query.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    /// Makes every call fail like an HTTP 500.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Makes calls for one query fail like an HTTP 500.
    pub fn with_failure(mut self, query: &str) -> Self {
        self.failures.insert(query.to_string());
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    async fn answer(&self, call: ProviderCall, key: &str) -> Result<Vec<MovieRecord>, SearchError> {
        self.calls.lock().push(call);

        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }

        if self.fail_all || self.failures.contains(key) {
            return Err(SearchError::SearchFailed {
                query: key.to_string(),
                reason: "HTTP 500 Internal Server Error".to_string(),
            });
        }

        Ok(self.results.get(key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    async fn discover_popular(&self) -> Result<Vec<MovieRecord>, SearchError> {
        self.answer(ProviderCall::Discover, "").await
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError> {
        self.answer(ProviderCall::Search(query.to_string()), query)
            .await
    }
}
