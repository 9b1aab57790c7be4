//! Trend tracker service errors

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors raised by the trend store and the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid search term: {reason}")]
    InvalidSearchTerm { reason: String },

    #[error("Snapshot persistence failed: {reason}")]
    PersistenceFailed { reason: String },

    #[error("Snapshot is corrupt: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("Failed to bind tracker to {address}: {reason}")]
    BindFailed { address: String, reason: String },

    #[error("Tracker server error: {reason}")]
    ServerFailed { reason: String },
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = match self {
            TrackerError::InvalidSearchTerm { .. } => StatusCode::BAD_REQUEST,
            TrackerError::PersistenceFailed { .. }
            | TrackerError::CorruptSnapshot { .. }
            | TrackerError::BindFailed { .. }
            | TrackerError::ServerFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
