//! In-memory trend tracker for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use marquee_core::{SearchEvent, TrendEntry};
use parking_lot::Mutex;

use super::TrendTracker;
use crate::errors::TrendError;

/// Tracker double that aggregates recorded events per term.
///
/// Either direction can be switched to fail, which lets tests observe how the
/// orchestrator reacts to an unreachable tracker.
#[derive(Debug, Default)]
pub struct MockTrendTracker {
    events: Mutex<Vec<SearchEvent>>,
    trending_calls: AtomicUsize,
    fail_record: AtomicBool,
    fail_trending: AtomicBool,
    trending_delays: Mutex<VecDeque<Duration>>,
}

impl MockTrendTracker {
    /// Creates a healthy tracker with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `record_search` fail.
    pub fn failing_record(self) -> Self {
        self.fail_record.store(true, Ordering::SeqCst);
        self
    }

    /// Makes `trending` fail.
    pub fn failing_trending(self) -> Self {
        self.fail_trending.store(true, Ordering::SeqCst);
        self
    }

    /// Delays successive `trending` answers, one delay per call in order.
    ///
    /// The answer is computed when the call arrives, before the delay.
    pub fn with_trending_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.trending_delays.lock().extend(delays);
        self
    }

    /// Switches `trending` failures on or off.
    pub fn set_trending_failure(&self, failing: bool) {
        self.fail_trending.store(failing, Ordering::SeqCst);
    }

    /// Events accepted so far.
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().clone()
    }

    /// Number of `trending` calls received, failed ones included.
    pub fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrendTracker for MockTrendTracker {
    async fn record_search(&self, event: &SearchEvent) -> Result<(), TrendError> {
        if self.fail_record.load(Ordering::SeqCst) {
            return Err(TrendError::Unreachable {
                reason: "connection refused".to_string(),
            });
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    async fn trending(&self) -> Result<Vec<TrendEntry>, TrendError> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trending.load(Ordering::SeqCst) {
            return Err(TrendError::HttpStatus { status: 500 });
        }

        let mut entries: Vec<TrendEntry> = Vec::new();
        for event in self.events.lock().iter() {
            match entries
                .iter_mut()
                .find(|entry| entry.search_term == event.search_term)
            {
                Some(entry) => entry.search_count += 1,
                None => entries.push(TrendEntry {
                    id: event.movie.id,
                    search_term: event.search_term.clone(),
                    search_count: 1,
                    poster_url: event.movie.poster_url.clone(),
                }),
            }
        }
        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.search_count.cmp(&a.search_count));

        let delay = self.trending_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(entries)
    }
}
