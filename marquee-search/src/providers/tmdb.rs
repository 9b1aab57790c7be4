//! TMDB-compatible metadata provider for production use.

use async_trait::async_trait;
use marquee_core::{MovieRecord, ProviderConfig};
use serde::Deserialize;
use tracing::debug;

use super::MetadataProvider;
use crate::errors::SearchError;

/// Metadata provider backed by a TMDB-compatible HTTP API.
///
/// Every request carries the API key, response language and `page=1`.
/// No timeout is set beyond the transport defaults.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

/// Paged response body shared by the search and discover endpoints.
#[derive(Debug, Deserialize)]
struct TmdbPage {
    results: Option<Vec<MovieRecord>>,
}

impl TmdbProvider {
    /// Create provider for the given API root and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            language: "en-US".to_string(),
        }
    }

    /// Create provider from configuration.
    ///
    /// # Errors
    /// - `SearchError::NotConfigured` - No API key configured
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SearchError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| SearchError::NotConfigured {
                reason: "no API key configured for the metadata provider".to_string(),
            })?;

        let mut provider = Self::new(config.base_url.clone(), api_key);
        provider.language = config.language.clone();
        Ok(provider)
    }

    fn discover_params(&self) -> [(&'static str, &str); 4] {
        [
            ("sort_by", "popularity.desc"),
            ("api_key", &self.api_key),
            ("language", &self.language),
            ("page", "1"),
        ]
    }

    fn search_params<'a>(&'a self, query: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("query", query),
            ("api_key", &self.api_key),
            ("language", &self.language),
            ("page", "1"),
            ("include_adult", "false"),
        ]
    }

    /// Performs a GET against `path` and decodes the `results` array.
    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, &str)],
        query: &str,
    ) -> Result<Vec<MovieRecord>, SearchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, query, "Requesting movies from metadata provider");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| SearchError::ProviderUnreachable {
                reason: format!("metadata request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(SearchError::SearchFailed {
                query: query.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let page: TmdbPage = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                reason: format!("metadata JSON parsing failed: {e}"),
            })?;

        let movies = page.results.unwrap_or_default();
        debug!(path, query, count = movies.len(), "Metadata provider answered");
        Ok(movies)
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn discover_popular(&self) -> Result<Vec<MovieRecord>, SearchError> {
        self.fetch("/discover/movie", &self.discover_params(), "").await
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError> {
        self.fetch("/search/movie", &self.search_params(query), query)
            .await
    }
}
