//! API handlers for search reports and trending reads

use axum::Json;
use axum::extract::State;
use marquee_core::{SearchEvent, TrendEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::TrackerError;
use crate::server::AppState;

/// Acknowledgement returned for an accepted search report.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSearchResponse {
    pub success: bool,
}

/// `POST /update_search`: counts one search for its term.
pub async fn api_update_search(
    State(state): State<AppState>,
    Json(event): Json<SearchEvent>,
) -> Result<Json<UpdateSearchResponse>, TrackerError> {
    match state.store.record(&event).await {
        Ok(count) => {
            debug!(term = %event.search_term, movie_id = event.movie.id, count, "Search reported");
            Ok(Json(UpdateSearchResponse { success: true }))
        }
        Err(e) => {
            warn!(term = %event.search_term, error = %e, "Rejected search report");
            Err(e)
        }
    }
}

/// `GET /trending`: top terms by search count.
pub async fn api_trending(State(state): State<AppState>) -> Json<Vec<TrendEntry>> {
    Json(state.store.top(state.trending_limit).await)
}
