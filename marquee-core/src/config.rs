//! Centralized configuration for Marquee.
//!
//! Deployment-specific values (API key, service URLs) are supplied through
//! the environment and passed explicitly into the components that need them.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{MarqueeError, RuntimeMode};

/// Central configuration for all Marquee components.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub provider: ProviderConfig,
    pub tracker: TrackerConfig,
    pub search: SearchConfig,
    pub images: ImageConfig,
}

/// Movie metadata provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the metadata API, without trailing slash
    pub base_url: String,
    /// API key sent with every request (required in production mode)
    pub api_key: Option<String>,
    /// Response language
    pub language: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            language: "en-US".to_string(),
        }
    }
}

/// Trend tracker settings, shared by the client and the service.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL clients use to reach the tracker
    pub base_url: String,
    /// Address the tracker service binds to
    pub bind_addr: SocketAddr,
    /// Number of entries returned by the trending endpoint
    pub trending_limit: usize,
    /// Snapshot file for persisting counts (None = memory only)
    pub store_path: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5000)),
            trending_limit: 5,
            store_path: None,
        }
    }
}

/// Search orchestration settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How long input must stay unchanged before a search fires
    pub debounce: Duration,
    /// Message shown when the metadata provider cannot be reached
    pub error_message: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            error_message: "Error fetching movies. Please try again later.".to_string(),
        }
    }
}

/// Poster image resolution settings.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Image CDN base URL
    pub base_url: String,
    /// Width variant used for trending entries
    pub trending_width: String,
    /// Width variant used for result cards
    pub card_width: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://image.tmdb.org/t/p".to_string(),
            trending_width: "w200".to_string(),
            card_width: "w500".to_string(),
        }
    }
}

impl ImageConfig {
    /// Resolves a poster path into a full image URL for the given width.
    ///
    /// Returns `None` for absent or empty paths.
    pub fn poster_url(&self, width: &str, poster_path: Option<&str>) -> Option<String> {
        poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/{}{}", self.base_url, width, path))
    }

    /// Resolves a poster for the trending row.
    pub fn trending_poster(&self, poster_path: Option<&str>) -> Option<String> {
        self.poster_url(&self.trending_width, poster_path)
    }

    /// Resolves a poster for a search result card.
    pub fn card_poster(&self, poster_path: Option<&str>) -> Option<String> {
        self.poster_url(&self.card_width, poster_path)
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Unparsable numeric values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.provider.api_key = lookup("MARQUEE_TMDB_API_KEY")
            .or_else(|| lookup("TMDB_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(base_url) = lookup("MARQUEE_TMDB_BASE_URL") {
            config.provider.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(base_url) = lookup("MARQUEE_TRACKER_URL") {
            config.tracker.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(millis) = lookup("MARQUEE_DEBOUNCE_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.search.debounce = Duration::from_millis(millis);
        }

        if let Some(limit) = lookup("MARQUEE_TRENDING_LIMIT").and_then(|v| v.parse::<usize>().ok())
        {
            config.tracker.trending_limit = limit;
        }

        if let Some(path) = lookup("MARQUEE_STORE_PATH").filter(|p| !p.is_empty()) {
            config.tracker.store_path = Some(PathBuf::from(path));
        }

        if let Some(addr) = lookup("MARQUEE_BIND_ADDR").and_then(|v| v.parse::<SocketAddr>().ok()) {
            config.tracker.bind_addr = addr;
        }

        config
    }

    /// Creates a configuration for tests: no debounce delay and a dummy key.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.provider.api_key = Some("test-key".to_string());
        config.search.debounce = Duration::ZERO;
        config
    }

    /// Checks that the configuration is usable in the given runtime mode.
    ///
    /// # Errors
    /// - `MarqueeError::Configuration` - Missing API key in production mode,
    ///   unparsable service URL, or a zero trending limit
    pub fn validate(&self, mode: RuntimeMode) -> crate::Result<()> {
        if mode.needs_api_key() && self.provider.api_key.is_none() {
            return Err(MarqueeError::Configuration {
                reason: "MARQUEE_TMDB_API_KEY must be set in production mode".to_string(),
            });
        }

        for (name, value) in [
            ("provider base URL", &self.provider.base_url),
            ("tracker base URL", &self.tracker.base_url),
            ("image base URL", &self.images.base_url),
        ] {
            Url::parse(value).map_err(|e| MarqueeError::Configuration {
                reason: format!("invalid {name} '{value}': {e}"),
            })?;
        }

        if self.tracker.trending_limit == 0 {
            return Err(MarqueeError::Configuration {
                reason: "trending limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_values() {
        let config = MarqueeConfig::default();

        assert_eq!(config.provider.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.provider.language, "en-US");
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.tracker.base_url, "http://localhost:5000");
        assert_eq!(config.tracker.trending_limit, 5);
        assert_eq!(config.search.debounce, Duration::from_millis(500));
        assert_eq!(
            config.search.error_message,
            "Error fetching movies. Please try again later."
        );
    }

    #[test]
    fn test_lookup_overrides() {
        let config = MarqueeConfig::from_lookup(lookup_from(&[
            ("MARQUEE_TMDB_API_KEY", "secret"),
            ("MARQUEE_TMDB_BASE_URL", "http://127.0.0.1:9000/"),
            ("MARQUEE_TRACKER_URL", "http://tracker.local:8080/"),
            ("MARQUEE_DEBOUNCE_MS", "250"),
            ("MARQUEE_TRENDING_LIMIT", "10"),
            ("MARQUEE_STORE_PATH", "/tmp/searches.json"),
            ("MARQUEE_BIND_ADDR", "0.0.0.0:7000"),
        ]));

        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert_eq!(config.provider.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.tracker.base_url, "http://tracker.local:8080");
        assert_eq!(config.search.debounce, Duration::from_millis(250));
        assert_eq!(config.tracker.trending_limit, 10);
        assert_eq!(
            config.tracker.store_path,
            Some(PathBuf::from("/tmp/searches.json"))
        );
        assert_eq!(config.tracker.bind_addr.port(), 7000);
    }

    #[test]
    fn test_fallback_api_key_and_bad_numbers() {
        let config = MarqueeConfig::from_lookup(lookup_from(&[
            ("TMDB_API_KEY", "fallback"),
            ("MARQUEE_DEBOUNCE_MS", "soon"),
        ]));

        assert_eq!(config.provider.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.search.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_validate_requires_key_in_production() {
        let config = MarqueeConfig::default();

        assert!(config.validate(RuntimeMode::Development).is_ok());
        let err = config.validate(RuntimeMode::Production).unwrap_err();
        assert!(err.to_string().contains("MARQUEE_TMDB_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_bad_url_and_zero_limit() {
        let mut config = MarqueeConfig::for_testing();
        config.tracker.base_url = "not a url".to_string();
        assert!(config.validate(RuntimeMode::Production).is_err());

        let mut config = MarqueeConfig::for_testing();
        config.tracker.trending_limit = 0;
        assert!(config.validate(RuntimeMode::Development).is_err());
    }

    #[test]
    fn test_poster_resolution() {
        let images = ImageConfig::default();

        assert_eq!(
            images.trending_poster(Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w200/abc.jpg")
        );
        assert_eq!(
            images.card_poster(Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(images.trending_poster(None), None);
        assert_eq!(images.card_poster(Some("")), None);
    }
}
