//! Marquee Search - Movie discovery client

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Queries a movie metadata provider, debounces user input, and reports
//! successful searches to the trend tracker so the trending row stays current.

pub mod debounce;
pub mod errors;
pub mod orchestrator;
pub mod providers;
pub mod tracker;

// Re-export main types
pub use debounce::{DebounceHandle, DebouncerClosed, spawn_debouncer};
pub use errors::{SearchError, TrendError};
pub use orchestrator::{SearchOrchestrator, SearchView};
pub use providers::{DemoProvider, MetadataProvider, MovieQuery, TmdbProvider};
pub use tracker::{HttpTrendTracker, TrendTracker};

/// Convenience type alias for Results with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
