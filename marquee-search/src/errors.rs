//! Error types for movie search and trend reporting.

use thiserror::Error;

/// Errors raised while fetching movies from the metadata provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider answered with a non-success status.
    #[error("Movie search for '{query}' was rejected: {reason}")]
    SearchFailed {
        /// Raw query text (empty for the popular list)
        query: String,
        /// Status line or provider message
        reason: String,
    },

    /// Provider could not be reached.
    #[error("Metadata provider unreachable: {reason}")]
    ProviderUnreachable {
        /// Transport failure description
        reason: String,
    },

    /// Provider response body was not the expected JSON.
    #[error("Metadata provider sent an unreadable response: {reason}")]
    InvalidResponse {
        /// Decoder failure description
        reason: String,
    },

    /// Provider cannot be built from the current settings.
    #[error("Metadata provider not configured: {reason}")]
    NotConfigured {
        /// Missing or invalid setting
        reason: String,
    },
}

/// Errors raised while talking to the trend tracker.
#[derive(Debug, Error)]
pub enum TrendError {
    /// Tracker could not be reached.
    #[error("Trend tracker unreachable: {reason}")]
    Unreachable {
        /// Transport failure description
        reason: String,
    },

    /// Tracker answered with a non-success status.
    #[error("Trend tracker returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code returned by the tracker
        status: u16,
    },

    /// Tracker response body was not the expected JSON.
    #[error("Trend tracker sent an unreadable response: {reason}")]
    InvalidResponse {
        /// Decoder failure description
        reason: String,
    },
}
