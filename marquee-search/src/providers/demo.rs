//! Demo provider implementation for offline development.

use async_trait::async_trait;
use marquee_core::MovieRecord;

use super::MetadataProvider;
use crate::errors::SearchError;

/// Demo provider serving a small built-in catalog.
///
/// Lets the whole search and trending workflow run without an API key.
/// Search is a case-insensitive title match; discover orders by popularity.
#[derive(Debug)]
pub struct DemoProvider {
    catalog: Vec<MovieRecord>,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    /// Creates the provider with the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(demo_catalog())
    }

    /// Creates the provider with a custom catalog.
    pub fn with_catalog(catalog: Vec<MovieRecord>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl MetadataProvider for DemoProvider {
    async fn discover_popular(&self) -> Result<Vec<MovieRecord>, SearchError> {
        let mut movies = self.catalog.clone();
        movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        Ok(movies)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

fn demo_movie(
    id: u64,
    title: &str,
    poster: Option<&str>,
    popularity: f64,
    vote_average: f64,
    release_date: &str,
) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        poster_path: poster.map(str::to_string),
        popularity,
        vote_average: Some(vote_average),
        release_date: Some(release_date.to_string()),
        original_language: Some("en".to_string()),
        overview: None,
    }
}

fn demo_catalog() -> Vec<MovieRecord> {
    vec![
        demo_movie(268, "Batman", Some("/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg"), 31.2, 7.2, "1989-06-21"),
        demo_movie(364, "Batman Returns", Some("/jKBjeXM7iBBV9UkUcOXx3m7FSHY.jpg"), 24.8, 6.9, "1992-06-19"),
        demo_movie(155, "The Dark Knight", Some("/qJ2tW6WMUDux911r6m7haRef0WH.jpg"), 88.5, 8.5, "2008-07-16"),
        demo_movie(27205, "Inception", Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"), 83.9, 8.4, "2010-07-15"),
        demo_movie(603, "The Matrix", Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"), 70.3, 8.2, "1999-03-31"),
        demo_movie(157336, "Interstellar", Some("/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg"), 95.1, 8.4, "2014-11-05"),
        demo_movie(949, "Heat", None, 35.6, 7.9, "1995-12-15"),
        demo_movie(129, "Spirited Away", Some("/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg"), 64.0, 8.5, "2001-07-20"),
    ]
}
