//! Movie metadata provider implementations.

use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::{MovieRecord, ProviderConfig, RuntimeMode};

use crate::errors::SearchError;

pub mod demo;
#[cfg(test)]
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
#[cfg(test)]
pub use mock::{MockProvider, ProviderCall};
pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers.
///
/// Implementations return movies in the provider's own ranking order; callers
/// never re-rank.
#[async_trait]
pub trait MetadataProvider: Send + Sync + std::fmt::Debug {
    /// Fetch the provider's default list, most popular first.
    ///
    /// # Errors
    /// - `SearchError::ProviderUnreachable` - Provider unreachable
    /// - `SearchError::SearchFailed` - Provider returned a non-success status
    /// - `SearchError::InvalidResponse` - Response body could not be decoded
    async fn discover_popular(&self) -> Result<Vec<MovieRecord>, SearchError>;

    /// Search movies matching `query`, first page only, adult titles excluded.
    ///
    /// # Errors
    /// - `SearchError::ProviderUnreachable` - Provider unreachable
    /// - `SearchError::SearchFailed` - Provider returned a non-success status
    /// - `SearchError::InvalidResponse` - Response body could not be decoded
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError>;
}

/// What a raw search input asks the provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieQuery<'a> {
    /// Empty input: the default popular list
    Popular,
    /// Non-empty input: a query-scoped search
    Search(&'a str),
}

impl<'a> MovieQuery<'a> {
    /// Classifies raw input. Only the exact empty string means "popular".
    pub fn from_input(input: &'a str) -> Self {
        if input.is_empty() {
            Self::Popular
        } else {
            Self::Search(input)
        }
    }

    /// Runs this query against a provider.
    ///
    /// # Errors
    /// Propagates the provider's `SearchError`.
    pub async fn run(self, provider: &dyn MetadataProvider) -> Result<Vec<MovieRecord>, SearchError> {
        match self {
            Self::Popular => provider.discover_popular().await,
            Self::Search(query) => provider.search_movies(query).await,
        }
    }
}

/// Builds the provider for a runtime mode.
///
/// Production talks to the configured metadata API; development serves the
/// built-in demo catalog.
///
/// # Errors
/// - `SearchError::NotConfigured` - Production mode without an API key
pub fn provider_for_mode(
    config: &ProviderConfig,
    mode: RuntimeMode,
) -> Result<Arc<dyn MetadataProvider>, SearchError> {
    match mode {
        RuntimeMode::Production => Ok(Arc::new(TmdbProvider::from_config(config)?)),
        RuntimeMode::Development => Ok(Arc::new(DemoProvider::new())),
    }
}
