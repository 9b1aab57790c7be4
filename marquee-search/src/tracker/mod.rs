//! Trend tracker clients.

use async_trait::async_trait;
use marquee_core::{SearchEvent, TrendEntry};

use crate::errors::TrendError;

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpTrendTracker;
#[cfg(test)]
pub use mock::MockTrendTracker;

/// Client side of the trend tracker contract.
#[async_trait]
pub trait TrendTracker: Send + Sync + std::fmt::Debug {
    /// Record one search event. Repeated events increment the count.
    ///
    /// # Errors
    /// - `TrendError::Unreachable` - Tracker could not be contacted
    /// - `TrendError::HttpStatus` - Tracker rejected the event
    async fn record_search(&self, event: &SearchEvent) -> Result<(), TrendError>;

    /// Read the current top entries, highest count first.
    ///
    /// # Errors
    /// - `TrendError::Unreachable` - Tracker could not be contacted
    /// - `TrendError::HttpStatus` - Tracker returned a non-success status
    /// - `TrendError::InvalidResponse` - Response body could not be decoded
    async fn trending(&self) -> Result<Vec<TrendEntry>, TrendError>;
}
