//! HTTP request handlers organized by functionality

pub mod api;

// Re-export handler functions
pub use api::{UpdateSearchResponse, api_trending, api_update_search};
