//! Where movie metadata comes from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selects the movie catalog behind searches.
///
/// The trend tracker is used the same way in both modes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Live TMDB searches; needs an API key
    #[value(alias = "prod")]
    Production,
    /// Built-in demo catalog, works offline
    #[default]
    #[value(alias = "dev")]
    Development,
}

impl RuntimeMode {
    /// Whether searches in this mode go to TMDB and need its API key.
    pub fn needs_api_key(self) -> bool {
        self == Self::Production
    }

    /// Human name of the catalog this mode searches.
    pub fn catalog_name(self) -> &'static str {
        match self {
            Self::Production => "TMDB",
            Self::Development => "demo catalog",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
