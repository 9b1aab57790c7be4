//! Integration tests for Marquee
//!
//! Run the search orchestrator against a live trend tracker bound to an
//! ephemeral port, with the metadata provider served by a mock HTTP server.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/discovery_flow.rs"]
mod discovery_flow;
#[path = "integration/tracker_api.rs"]
mod tracker_api;
