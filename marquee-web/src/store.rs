//! Search count aggregation for the trend tracker.
//!
//! Counts are kept per search term. The first report of a term caches the
//! reported movie id and poster; every later report only bumps the count.
//! Ranking is by count (highest first), ties broken by first-seen order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use marquee_core::{MovieId, SearchEvent, TrendEntry};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::TrackerError;

/// One aggregated search term as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrend {
    /// First-seen position, used as tie breaker
    pub seq: u64,
    pub search_term: String,
    pub movie_id: MovieId,
    pub poster_url: Option<String>,
    pub count: u64,
    pub first_searched: DateTime<Utc>,
    pub last_searched: DateTime<Utc>,
}

impl StoredTrend {
    fn to_entry(&self) -> TrendEntry {
        TrendEntry {
            id: self.movie_id,
            search_term: self.search_term.clone(),
            search_count: self.count,
            poster_url: self.poster_url.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: Vec<StoredTrend>,
}

/// In-memory aggregation table.
#[derive(Debug, Default)]
pub struct TrendTable {
    entries: HashMap<String, StoredTrend>,
    next_seq: u64,
}

impl TrendTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from stored entries.
    pub fn from_entries(entries: Vec<StoredTrend>) -> Self {
        let next_seq = entries.iter().map(|e| e.seq + 1).max().unwrap_or(0);
        let entries = entries
            .into_iter()
            .map(|entry| (entry.search_term.clone(), entry))
            .collect();
        Self { entries, next_seq }
    }

    /// Records one search and returns the new count for its term.
    ///
    /// # Errors
    /// - `TrackerError::InvalidSearchTerm` - Term is empty or whitespace only
    pub fn record(&mut self, event: &SearchEvent, now: DateTime<Utc>) -> Result<u64, TrackerError> {
        if event.search_term.trim().is_empty() {
            return Err(TrackerError::InvalidSearchTerm {
                reason: "search term must not be empty".to_string(),
            });
        }

        if let Some(entry) = self.entries.get_mut(&event.search_term) {
            entry.count += 1;
            entry.last_searched = now;
            return Ok(entry.count);
        }

        let entry = StoredTrend {
            seq: self.next_seq,
            search_term: event.search_term.clone(),
            movie_id: event.movie.id,
            poster_url: event.movie.poster_url.clone().filter(|p| !p.is_empty()),
            count: 1,
            first_searched: now,
            last_searched: now,
        };
        self.next_seq += 1;
        self.entries.insert(event.search_term.clone(), entry);
        Ok(1)
    }

    /// Top `limit` entries, highest count first, then oldest first.
    pub fn top(&self, limit: usize) -> Vec<TrendEntry> {
        let mut ranked: Vec<&StoredTrend> = self.entries.values().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.seq.cmp(&b.seq)));
        ranked
            .into_iter()
            .take(limit)
            .map(StoredTrend::to_entry)
            .collect()
    }

    /// Count for a term, if it was ever reported.
    pub fn count(&self, term: &str) -> Option<u64> {
        self.entries.get(term).map(|e| e.count)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no term was reported yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn snapshot(&self) -> Snapshot {
        let mut entries: Vec<StoredTrend> = self.entries.values().cloned().collect();
        entries.sort_by_key(|e| e.seq);
        Snapshot { entries }
    }
}

/// Shared trend store, optionally backed by a JSON snapshot file.
#[derive(Debug)]
pub struct TrendStore {
    table: RwLock<TrendTable>,
    snapshot_path: Option<PathBuf>,
}

impl TrendStore {
    /// Creates a store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            table: RwLock::new(TrendTable::new()),
            snapshot_path: None,
        }
    }

    /// Opens a store persisted at `path`, loading it if the file exists.
    ///
    /// # Errors
    /// - `TrackerError::PersistenceFailed` - File exists but cannot be read
    /// - `TrackerError::CorruptSnapshot` - File is not a valid snapshot
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();

        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot =
                    serde_json::from_slice(&bytes).map_err(|e| TrackerError::CorruptSnapshot {
                        reason: format!("{}: {e}", path.display()),
                    })?;
                info!(
                    path = %path.display(),
                    terms = snapshot.entries.len(),
                    "Loaded trend snapshot"
                );
                TrendTable::from_entries(snapshot.entries)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No trend snapshot yet, starting empty");
                TrendTable::new()
            }
            Err(e) => {
                return Err(TrackerError::PersistenceFailed {
                    reason: format!("failed to read {}: {e}", path.display()),
                });
            }
        };

        Ok(Self {
            table: RwLock::new(table),
            snapshot_path: Some(path),
        })
    }

    /// Records one search event and returns the new count for its term.
    ///
    /// The in-memory count is updated even when writing the snapshot fails.
    ///
    /// # Errors
    /// - `TrackerError::InvalidSearchTerm` - Term is empty or whitespace only
    /// - `TrackerError::PersistenceFailed` - Snapshot could not be written
    pub async fn record(&self, event: &SearchEvent) -> Result<u64, TrackerError> {
        let mut table = self.table.write().await;
        let count = table.record(event, Utc::now())?;
        debug!(term = %event.search_term, count, "Recorded search");

        if let Some(path) = &self.snapshot_path {
            write_snapshot(path, &table.snapshot()).await?;
        }

        Ok(count)
    }

    /// Current top `limit` entries.
    pub async fn top(&self, limit: usize) -> Vec<TrendEntry> {
        self.table.read().await.top(limit)
    }

    /// Count for a term, if it was ever reported.
    pub async fn count(&self, term: &str) -> Option<u64> {
        self.table.read().await.count(term)
    }

    /// Number of distinct terms.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }
}

/// Writes the snapshot next to `path` and renames it into place.
async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), TrackerError> {
    let persistence_failed = |e: std::io::Error| TrackerError::PersistenceFailed {
        reason: format!("{}: {e}", path.display()),
    };

    let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| TrackerError::PersistenceFailed {
        reason: format!("snapshot serialization failed: {e}"),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(persistence_failed)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    tokio::fs::write(&temp_path, &bytes)
        .await
        .map_err(persistence_failed)?;
    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(persistence_failed)?;

    Ok(())
}
