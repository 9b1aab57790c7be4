//! Shared fixtures: a live tracker and a wired-up orchestrator.

use std::sync::Arc;

use marquee_core::MarqueeConfig;
use marquee_search::{HttpTrendTracker, SearchOrchestrator, TmdbProvider};
use marquee_web::{AppState, TrackerError, TrendStore};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const BATMAN_PAGE: &str = r#"{
    "page": 1,
    "results": [
        {"id": 1, "title": "Batman", "poster_path": "/bat.jpg", "popularity": 40.1, "release_date": "1989-06-21"},
        {"id": 2, "title": "Batman Returns", "poster_path": "/returns.jpg", "popularity": 22.0}
    ]
}"#;

pub const POPULAR_PAGE: &str = r#"{
    "page": 1,
    "results": [
        {"id": 157336, "title": "Interstellar", "poster_path": "/int.jpg", "popularity": 95.1},
        {"id": 155, "title": "The Dark Knight", "poster_path": "/tdk.jpg", "popularity": 88.5}
    ]
}"#;

/// Trend tracker serving on an ephemeral local port.
pub struct RunningTracker {
    pub base_url: String,
    pub state: AppState,
    stop: oneshot::Sender<()>,
    server: JoinHandle<Result<(), TrackerError>>,
}

impl RunningTracker {
    pub async fn start() -> Self {
        Self::with_store(TrendStore::in_memory(), 5).await
    }

    pub async fn with_store(store: TrendStore, limit: usize) -> Self {
        let listener = marquee_web::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let address = listener.local_addr().unwrap();
        let state = AppState::new(Arc::new(store), limit);

        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(marquee_web::serve(listener, state.clone(), async {
            let _ = stopped.await;
        }));

        Self {
            base_url: format!("http://{address}"),
            state,
            stop,
            server,
        }
    }

    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        self.server.await.unwrap().unwrap();
    }
}

/// Orchestrator talking to a mock metadata provider and a tracker URL.
pub fn orchestrator(provider_url: &str, tracker_url: &str) -> SearchOrchestrator {
    SearchOrchestrator::new(
        MarqueeConfig::for_testing(),
        Arc::new(TmdbProvider::new(provider_url, "test-key")),
        Arc::new(HttpTrendTracker::new(tracker_url)),
    )
}
