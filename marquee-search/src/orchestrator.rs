//! # Search Orchestrator
//!
//! Coordinates one movie discovery session:
//! 1. Run the (debounced) query against the metadata provider
//! 2. Publish results or an error message to the display state
//! 3. For a non-empty query with results, report the top result to the
//!    trend tracker
//! 4. Refresh the trending list after a successful report
//!
//! The display state is owned here and published through a `watch` channel.
//! Every search and every trending load takes a generation number; a
//! response only reaches the display if nothing newer has been applied yet,
//! so a slow, superseded search can never overwrite a later one.

use std::sync::Arc;

use marquee_core::{MarqueeConfig, MovieRecord, RuntimeMode, SearchEvent, TrendEntry};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::{SearchError, TrendError};
use crate::providers::{MetadataProvider, MovieQuery, provider_for_mode};
use crate::tracker::{HttpTrendTracker, TrendTracker};

/// Display state of a discovery session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    /// Query of the most recently started search
    pub query: String,
    /// Results of the most recently applied search
    pub movies: Vec<MovieRecord>,
    /// Trending entries exactly as ranked by the tracker
    pub trending: Vec<TrendEntry>,
    /// True while a started search has not been applied yet
    pub is_loading: bool,
    /// User-facing message after a failed search
    pub error_message: Option<String>,
}

impl SearchView {
    /// Whether the trending section should be shown at all.
    pub fn shows_trending(&self) -> bool {
        !self.trending.is_empty()
    }
}

#[derive(Debug, Default)]
struct Generations {
    search_issued: u64,
    search_applied: u64,
    trending_issued: u64,
    trending_applied: u64,
    last_query: Option<String>,
}

/// Orchestrates searches, trend reports and trending refreshes.
///
/// Cheap to clone; clones share the same display state.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    config: Arc<MarqueeConfig>,
    provider: Arc<dyn MetadataProvider>,
    tracker: Arc<dyn TrendTracker>,
    generations: Arc<Mutex<Generations>>,
    view: Arc<watch::Sender<SearchView>>,
}

/// Returns the result to report for a finished search, if any.
///
/// Only non-empty queries are reported, and only their first result.
fn reportable_result<'a>(query: &str, movies: &'a [MovieRecord]) -> Option<&'a MovieRecord> {
    if query.is_empty() {
        None
    } else {
        movies.first()
    }
}

impl SearchOrchestrator {
    /// Create an orchestrator over explicit provider and tracker clients.
    pub fn new(
        config: MarqueeConfig,
        provider: Arc<dyn MetadataProvider>,
        tracker: Arc<dyn TrendTracker>,
    ) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            config: Arc::new(config),
            provider,
            tracker,
            generations: Arc::new(Mutex::new(Generations::default())),
            view: Arc::new(view),
        }
    }

    /// Create an orchestrator wired to real services for a runtime mode.
    ///
    /// # Errors
    /// - `SearchError::NotConfigured` - Production mode without an API key
    pub fn from_mode(config: MarqueeConfig, mode: RuntimeMode) -> Result<Self, SearchError> {
        let provider = provider_for_mode(&config.provider, mode)?;
        let tracker = Arc::new(HttpTrendTracker::from_config(&config.tracker));
        info!(
            %mode,
            catalog = mode.catalog_name(),
            tracker = %config.tracker.base_url,
            "Search orchestrator ready"
        );
        Ok(Self::new(config, provider, tracker))
    }

    /// Configuration this orchestrator was built with.
    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    /// Snapshot of the current display state.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Subscribe to display state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// Fetch movies for a raw query without touching the display state.
    ///
    /// An empty query asks for the popular list; anything else is a scoped
    /// search with adult titles excluded. An empty result list is not an error.
    ///
    /// # Errors
    /// - `SearchError::ProviderUnreachable` - Provider unreachable
    /// - `SearchError::SearchFailed` - Provider returned a non-success status
    /// - `SearchError::InvalidResponse` - Response body could not be decoded
    pub async fn search(&self, query: &str) -> Result<Vec<MovieRecord>, SearchError> {
        MovieQuery::from_input(query)
            .run(self.provider.as_ref())
            .await
    }

    /// Handles a settled query change: search, display, then report.
    pub async fn on_query_changed(&self, query: &str) {
        let generation = self.begin_search(query);

        let top_result = match self.search(query).await {
            Ok(movies) => {
                debug!(query, count = movies.len(), "Search finished");
                let top_result = reportable_result(query, &movies).cloned();
                self.finish_search(generation, movies, None);
                top_result
            }
            Err(e) => {
                warn!(query, error = %e, "Error fetching movies");
                let message = self.config.search.error_message.clone();
                self.finish_search(generation, Vec::new(), Some(message));
                None
            }
        };

        if let Some(top_result) = top_result {
            // Errors are logged and dropped inside: the result list is already
            // published and trending must never affect it.
            self.report_and_refresh_trending(query, &top_result).await;
        }
    }

    /// Handles the session start: trending list plus the popular list.
    pub async fn on_mounted(&self) {
        info!("Loading trending and popular movies");
        tokio::join!(self.load_trending(), self.on_query_changed(""));
    }

    /// Reports a search to the tracker and refreshes trending on success.
    ///
    /// Does nothing for an empty query. Failures are logged, never returned.
    pub async fn report_and_refresh_trending(&self, query: &str, top_result: &MovieRecord) {
        if query.is_empty() {
            debug!("Popular list is not reported to the trend tracker");
            return;
        }

        let event = SearchEvent::for_top_result(query, top_result);
        match self.report(&event).await {
            Ok(()) => {
                info!(query, movie_id = top_result.id, "Search reported to trend tracker");
                self.load_trending().await;
            }
            Err(e) => {
                warn!(query, error = %e, "Trend tracker update failed");
            }
        }
    }

    async fn report(&self, event: &SearchEvent) -> Result<(), TrendError> {
        self.tracker.record_search(event).await
    }

    /// Loads the trending list into the display state and returns it.
    ///
    /// Any failure yields (and displays) an empty list.
    pub async fn load_trending(&self) -> Vec<TrendEntry> {
        let generation = {
            let mut generations = self.generations.lock();
            generations.trending_issued += 1;
            generations.trending_issued
        };

        let entries = match self.tracker.trending().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Error fetching trending movies");
                Vec::new()
            }
        };

        let mut generations = self.generations.lock();
        if generation < generations.trending_applied {
            debug!(generation, "Dropping stale trending response");
        } else {
            generations.trending_applied = generation;
            let published = entries.clone();
            self.view.send_modify(|view| view.trending = published);
        }

        entries
    }

    /// Feeds settled queries (e.g. from a debouncer) into the orchestrator.
    ///
    /// Each query runs as its own task so a slow search never delays the
    /// next one. A settled query equal to the last one started is skipped.
    /// Returns once the channel closes and every started search finished.
    pub async fn run_settled_queries(&self, mut settled: mpsc::Receiver<String>) {
        let mut searches = JoinSet::new();

        while let Some(query) = settled.recv().await {
            if !self.claim_query(&query) {
                debug!(query, "Settled query unchanged, skipping search");
                continue;
            }

            let orchestrator = self.clone();
            searches.spawn(async move { orchestrator.on_query_changed(&query).await });

            while searches.try_join_next().is_some() {}
        }

        while let Some(result) = searches.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Search task ended abnormally");
            }
        }
    }

    /// Records `query` as the latest one unless it already is.
    fn claim_query(&self, query: &str) -> bool {
        let mut generations = self.generations.lock();
        if generations.last_query.as_deref() == Some(query) {
            return false;
        }
        generations.last_query = Some(query.to_string());
        true
    }

    fn begin_search(&self, query: &str) -> u64 {
        let mut generations = self.generations.lock();
        generations.search_issued += 1;
        generations.last_query = Some(query.to_string());

        self.view.send_modify(|view| {
            view.query = query.to_string();
            view.is_loading = true;
            view.error_message = None;
        });

        generations.search_issued
    }

    fn finish_search(&self, generation: u64, movies: Vec<MovieRecord>, error: Option<String>) {
        let mut generations = self.generations.lock();
        if generation < generations.search_applied {
            debug!(generation, "Dropping stale search response");
            return;
        }

        generations.search_applied = generation;
        let still_loading = generation < generations.search_issued;

        self.view.send_modify(|view| {
            view.movies = movies;
            view.error_message = error;
            view.is_loading = still_loading;
        });
    }
}
