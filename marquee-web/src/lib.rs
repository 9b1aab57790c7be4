//! Marquee Web - Trend tracker JSON API server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Aggregates search reports per search term and serves the most searched
//! terms to the discovery client.

pub mod errors;
pub mod handlers;
pub mod server;
pub mod store;

// Re-export main types
pub use errors::TrackerError;
pub use server::{AppState, bind, router, run_server, serve, shutdown_signal};
pub use store::{StoredTrend, TrendStore, TrendTable};
