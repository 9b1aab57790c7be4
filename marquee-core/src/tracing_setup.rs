//! Tracing setup for Marquee binaries
//!
//! Two layers share one registry. The console shows what the user asked for
//! on stderr, keeping stdout free for command output. The log file receives
//! everything Marquee itself emits, plus warnings from dependencies, and is
//! rewritten on every run.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::MarqueeError;

/// File name of the per-run debug log inside the logs directory.
pub const LAST_RUN_LOG: &str = "marquee-last-run.log";

const FILE_DIRECTIVES: &str =
    "warn,marquee_core=trace,marquee_search=trace,marquee_web=trace,marquee=trace";

/// Installs the global subscriber and returns the path of the run log.
///
/// `RUST_LOG`, when set, replaces `console_level` for the console layer only.
/// `logs_dir` defaults to `./logs`.
///
/// # Errors
/// - `MarqueeError::Io` - Logs directory or log file cannot be created
/// - `MarqueeError::Configuration` - A global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> crate::Result<PathBuf> {
    let logs_dir = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_dir)?;

    let log_path = logs_dir.join(LAST_RUN_LOG);
    let log_file = File::create(&log_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.as_str().to_lowercase()));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_filter(EnvFilter::new(FILE_DIRECTIVES));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MarqueeError::Configuration {
            reason: format!("tracing already initialized: {e}"),
        })?;

    tracing::debug!(console = %console_level, log = %log_path.display(), "Tracing ready");
    Ok(log_path)
}

/// Console verbosity selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Failures only
    Error,
    /// Degraded behavior, such as an unreachable trend tracker
    Warn,
    /// Lifecycle events and search reports
    Info,
    /// Individual requests and responses
    Debug,
    /// Debouncer and generation bookkeeping
    Trace,
}

impl CliLogLevel {
    /// Tracing level for this verbosity.
    pub fn as_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_levels_map_to_tracing_levels() {
        assert_eq!(CliLogLevel::Error.as_tracing_level(), Level::ERROR);
        assert_eq!(CliLogLevel::Warn.as_tracing_level(), Level::WARN);
        assert_eq!(CliLogLevel::Info.as_tracing_level(), Level::INFO);
        assert_eq!(CliLogLevel::Trace.as_tracing_level(), Level::TRACE);
    }

    #[test]
    fn test_init_writes_run_log_once() {
        let dir = tempfile::tempdir().unwrap();
        let logs_dir = dir.path().join("logs");

        let log_path = init_tracing(Level::WARN, Some(&logs_dir)).unwrap();
        assert_eq!(log_path, logs_dir.join(LAST_RUN_LOG));
        assert!(log_path.exists());

        let err = init_tracing(Level::WARN, Some(&logs_dir)).unwrap_err();
        assert!(err.is_user_error());
    }
}
