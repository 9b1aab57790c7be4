//! Movie and trending data model shared by the search client and tracker.

use serde::{Deserialize, Serialize};

/// Stable movie identifier assigned by the metadata provider.
pub type MovieId = u64;

/// Movie as returned by the metadata provider.
///
/// Only `id` is required on the wire; everything else falls back to a
/// default so partially populated records stay usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
}

impl MovieRecord {
    /// Creates a record with only an id and title set.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            popularity: 0.0,
            vote_average: None,
            release_date: None,
            original_language: None,
            overview: None,
        }
    }

    /// Sets the poster path.
    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Sets the popularity score.
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    /// Poster path, treating an empty string as absent.
    pub fn poster(&self) -> Option<&str> {
        self.poster_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Release year taken from the `YYYY-MM-DD` release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Report sent to the trend tracker after a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub movie: SearchEventMovie,
}

/// Top result reference carried by a [`SearchEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEventMovie {
    pub id: MovieId,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl SearchEvent {
    /// Builds the report for a query and its top result.
    pub fn for_top_result(search_term: impl Into<String>, movie: &MovieRecord) -> Self {
        Self {
            search_term: search_term.into(),
            movie: SearchEventMovie {
                id: movie.id,
                poster_url: movie.poster().map(str::to_string),
            },
        }
    }
}

/// Aggregated search count for one search term.
///
/// `poster_url` holds the poster path of the movie cached when the term was
/// first reported, not a resolved image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntry {
    pub id: MovieId,
    pub search_term: String,
    pub search_count: u64,
    #[serde(rename = "poster_url", default)]
    pub poster_url: Option<String>,
}

impl TrendEntry {
    /// Poster path, treating an empty string as absent.
    pub fn poster(&self) -> Option<&str> {
        self.poster_url.as_deref().filter(|p| !p.is_empty())
    }
}
