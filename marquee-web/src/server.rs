//! Trend tracker HTTP server
//!
//! JSON API consumed by the search client:
//! - `POST /update_search` records one search event
//! - `GET /trending` returns the top entries by search count

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use marquee_core::TrackerConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::TrackerError;
use crate::handlers::{api_trending, api_update_search};
use crate::store::TrendStore;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TrendStore>,
    pub trending_limit: usize,
}

impl AppState {
    /// Creates state over an existing store.
    pub fn new(store: Arc<TrendStore>, trending_limit: usize) -> Self {
        Self {
            store,
            trending_limit,
        }
    }

    /// Builds state from configuration, loading the snapshot if one is set.
    ///
    /// # Errors
    /// - `TrackerError::PersistenceFailed` - Snapshot file cannot be read
    /// - `TrackerError::CorruptSnapshot` - Snapshot file is not valid
    pub async fn from_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let store = match &config.store_path {
            Some(path) => TrendStore::open(path.clone()).await?,
            None => TrendStore::in_memory(),
        };
        Ok(Self::new(Arc::new(store), config.trending_limit))
    }
}

/// Builds the tracker router with permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/update_search", post(api_update_search))
        .route("/trending", get(api_trending))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the tracker on an already bound listener until `shutdown` resolves.
///
/// # Errors
/// - `TrackerError::ServerFailed` - Accept loop failed
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TrackerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TrackerError::ServerFailed {
            reason: e.to_string(),
        })
}

/// Runs the tracker at the configured address until `shutdown` resolves.
///
/// # Errors
/// - `TrackerError::BindFailed` - Address unavailable
/// - `TrackerError::PersistenceFailed` - Snapshot file cannot be read
/// - `TrackerError::CorruptSnapshot` - Snapshot file is not valid
/// - `TrackerError::ServerFailed` - Accept loop failed
pub async fn run_server(
    config: TrackerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TrackerError> {
    let state = AppState::from_config(&config).await?;
    let listener = bind(config.bind_addr).await?;

    info!(
        address = %config.bind_addr,
        limit = config.trending_limit,
        persisted = config.store_path.is_some(),
        "Trend tracker running"
    );

    serve(listener, state, shutdown).await?;
    info!("Trend tracker stopped");
    Ok(())
}

/// Binds the tracker listener.
///
/// # Errors
/// - `TrackerError::BindFailed` - Address unavailable
pub async fn bind(address: SocketAddr) -> Result<TcpListener, TrackerError> {
    TcpListener::bind(address)
        .await
        .map_err(|e| TrackerError::BindFailed {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown signal received");
}
