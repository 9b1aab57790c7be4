//! Marquee Core - Shared building blocks for movie discovery
//!
//! Configuration, runtime mode selection, the movie and trending data model
//! shared by the search client and the trend tracker service, and tracing
//! setup for the binaries.

pub mod config;
pub mod mode;
pub mod tracing_setup;
pub mod types;

pub use config::{ImageConfig, MarqueeConfig, ProviderConfig, SearchConfig, TrackerConfig};
pub use mode::RuntimeMode;
pub use types::{MovieId, MovieRecord, SearchEvent, SearchEventMovie, TrendEntry};

/// Core errors raised while assembling Marquee components.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            MarqueeError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user-supplied settings.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
