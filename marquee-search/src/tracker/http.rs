//! HTTP client for the trend tracker service.

use async_trait::async_trait;
use marquee_core::{SearchEvent, TrackerConfig, TrendEntry};
use tracing::debug;

use super::TrendTracker;
use crate::errors::TrendError;

/// Trend tracker reached over HTTP (`POST /update_search`, `GET /trending`).
#[derive(Debug, Clone)]
pub struct HttpTrendTracker {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTrendTracker {
    /// Create client for the tracker at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create client from configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TrendTracker for HttpTrendTracker {
    async fn record_search(&self, event: &SearchEvent) -> Result<(), TrendError> {
        let url = format!("{}/update_search", self.base_url);
        debug!(term = %event.search_term, movie_id = event.movie.id, "Reporting search");

        let response = self
            .client
            .post(&url)
            .json(event)
            .send()
            .await
            .map_err(|e| TrendError::Unreachable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TrendError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    async fn trending(&self) -> Result<Vec<TrendEntry>, TrendError> {
        let url = format!("{}/trending", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendError::Unreachable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TrendError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Vec<TrendEntry>>()
            .await
            .map_err(|e| TrendError::InvalidResponse {
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use marquee_core::MovieRecord;
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_record_search_posts_event() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/update_search")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "searchTerm": "batman",
                "movie": { "id": 1, "poster_url": "/bat.jpg" }
            })))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let tracker = HttpTrendTracker::new(server.url());
        let movie = MovieRecord::new(1, "Batman").with_poster("/bat.jpg");
        tracker
            .record_search(&SearchEvent::for_top_result("batman", &movie))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_record_search_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/update_search")
            .with_status(503)
            .create_async()
            .await;

        let tracker = HttpTrendTracker::new(server.url());
        let movie = MovieRecord::new(1, "Batman");
        let err = tracker
            .record_search(&SearchEvent::for_top_result("batman", &movie))
            .await
            .unwrap_err();

        assert!(matches!(err, TrendError::HttpStatus { status: 503 }));
    }

    #[tokio::test]
    async fn test_trending_decodes_entries() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/trending")
            .with_status(200)
            .with_body(
                json!([
                    { "id": 1, "searchTerm": "batman", "searchCount": 3, "poster_url": "/bat.jpg" },
                    { "id": 949, "searchTerm": "heat", "searchCount": 1, "poster_url": null }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let tracker = HttpTrendTracker::new(format!("{}/", server.url()));
        let entries = tracker.trending().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].search_count, 3);
        assert_eq!(entries[1].poster(), None);
    }

    #[tokio::test]
    async fn test_trending_bad_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/trending")
            .with_status(200)
            .with_body(r#"{"error": "nope"}"#)
            .create_async()
            .await;

        let tracker = HttpTrendTracker::new(server.url());
        assert!(matches!(
            tracker.trending().await,
            Err(TrendError::InvalidResponse { .. })
        ));
    }
}
