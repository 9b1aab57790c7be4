//! CLI command implementations

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use marquee_core::{ImageConfig, MarqueeConfig, RuntimeMode, TrendEntry};
use marquee_search::{
    HttpTrendTracker, SearchOrchestrator, SearchView, TrendTracker, spawn_debouncer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the trend tracker service
    Tracker {
        /// Address to bind to
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// JSON snapshot file for persisting counts
        #[arg(long)]
        store: Option<PathBuf>,
        /// Number of entries served by /trending
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search movies once and report the top result
    Search {
        /// Search text; empty lists popular movies
        #[arg(default_value = "")]
        query: String,
    },
    /// Show the current trending searches
    Trending,
    /// Read queries from stdin, one per line, with debounced searching
    Browse,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failure of the command that ran, with context.
pub async fn handle_command(
    command: Commands,
    mut config: MarqueeConfig,
    mode: RuntimeMode,
) -> Result<()> {
    match command {
        Commands::Tracker { bind, store, limit } => {
            if let Some(bind) = bind {
                config.tracker.bind_addr = bind;
            }
            if store.is_some() {
                config.tracker.store_path = store;
            }
            if let Some(limit) = limit {
                config.tracker.trending_limit = limit;
            }
            run_tracker(config).await
        }
        Commands::Search { query } => search_once(config, mode, &query).await,
        Commands::Trending => show_trending(config).await,
        Commands::Browse => browse(config, mode).await,
    }
}

fn validated(config: &MarqueeConfig, mode: RuntimeMode) -> Result<()> {
    config
        .validate(mode)
        .map_err(|e| anyhow!(e.user_message()))
        .context("refusing to start")
}

fn build_orchestrator(config: MarqueeConfig, mode: RuntimeMode) -> Result<SearchOrchestrator> {
    validated(&config, mode)?;
    SearchOrchestrator::from_mode(config, mode).context("failed to set up movie search")
}

/// Runs the trend tracker until Ctrl-C.
///
/// # Errors
/// - Bind, snapshot or server failures from the tracker service
pub async fn run_tracker(config: MarqueeConfig) -> Result<()> {
    if config.tracker.trending_limit == 0 {
        return Err(anyhow!("trending limit must be greater than zero"));
    }

    let address = config.tracker.bind_addr;
    println!("Marquee trend tracker running on http://{address}");
    marquee_web::run_server(config.tracker, marquee_web::shutdown_signal())
        .await
        .with_context(|| format!("trend tracker on {address} failed"))
}

/// Runs one search, reporting it to the tracker like the interactive flow.
///
/// # Errors
/// - Invalid configuration for the runtime mode
pub async fn search_once(config: MarqueeConfig, mode: RuntimeMode, query: &str) -> Result<()> {
    let orchestrator = build_orchestrator(config, mode)?;
    orchestrator.on_query_changed(query).await;

    let view = orchestrator.view();
    print!("{}", render_view(&view, &orchestrator.config().images));
    Ok(())
}

/// Prints the tracker's current trending list.
///
/// # Errors
/// - Tracker unreachable or answering with an error
pub async fn show_trending(config: MarqueeConfig) -> Result<()> {
    let tracker = HttpTrendTracker::from_config(&config.tracker);
    let entries = tracker
        .trending()
        .await
        .with_context(|| format!("failed to read trending from {}", tracker.base_url()))?;

    if entries.is_empty() {
        println!("No trending searches yet");
    } else {
        print!("{}", render_trending(&entries, &config.images));
    }
    Ok(())
}

/// Interactive session: each stdin line replaces the search text.
///
/// # Errors
/// - Invalid configuration for the runtime mode
/// - Reading stdin failed
pub async fn browse(config: MarqueeConfig, mode: RuntimeMode) -> Result<()> {
    let debounce = config.search.debounce;
    let orchestrator = build_orchestrator(config, mode)?;

    orchestrator.on_mounted().await;
    print!("{}", render_view(&orchestrator.view(), &orchestrator.config().images));
    println!(
        "Searching the {}. Type a search and press enter (Ctrl-D to quit)",
        mode.catalog_name()
    );

    let (input, settled) = spawn_debouncer::<String>(debounce);

    let driver = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.run_settled_queries(settled).await }
    });

    let printer = tokio::spawn({
        let images = orchestrator.config().images.clone();
        let updates = orchestrator.subscribe();
        async move {
            follow_views(updates, |view| print!("{}", render_view(view, &images))).await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        debug!(input = %line, "Search text changed");
        if input.push(line).await.is_err() {
            break;
        }
    }

    drop(input);
    driver.await.context("search driver stopped abnormally")?;
    // Last sender gone: the printer drains the final view and returns.
    drop(orchestrator);
    printer.await.context("view printer stopped abnormally")?;

    info!("Browse session ended");
    Ok(())
}

/// Calls `emit` for every settled view until the orchestrator is dropped.
///
/// Views still loading and repeats of the last emitted view are skipped. A
/// change published just before the sender closes is still emitted.
async fn follow_views(mut updates: watch::Receiver<SearchView>, mut emit: impl FnMut(&SearchView)) {
    let mut last_emitted: Option<SearchView> = None;
    while updates.changed().await.is_ok() {
        let view = updates.borrow_and_update().clone();
        if view.is_loading || last_emitted.as_ref() == Some(&view) {
            continue;
        }
        emit(&view);
        last_emitted = Some(view);
    }
}

fn render_view(view: &SearchView, images: &ImageConfig) -> String {
    let mut out = String::new();

    if view.shows_trending() {
        out.push_str("Trending\n");
        out.push_str(&render_trending(&view.trending, images));
    }

    let heading = if view.query.is_empty() {
        "Popular movies".to_string()
    } else {
        format!("Results for \"{}\"", view.query)
    };
    out.push_str(&format!("{heading}\n"));

    if let Some(message) = &view.error_message {
        out.push_str(&format!("  {message}\n"));
        return out;
    }

    if view.movies.is_empty() {
        out.push_str("  No movies found\n");
    }

    for movie in &view.movies {
        let rating = movie
            .vote_average
            .map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"));
        let year = movie.release_year().unwrap_or("N/A");
        let poster = images
            .card_poster(movie.poster())
            .unwrap_or_else(|| "no poster".to_string());
        out.push_str(&format!(
            "  {} ({year}) rating {rating}  {poster}\n",
            movie.title
        ));
    }

    out
}

fn render_trending(entries: &[TrendEntry], images: &ImageConfig) -> String {
    let mut out = String::new();
    for (rank, entry) in entries.iter().enumerate() {
        let poster = images
            .trending_poster(entry.poster())
            .unwrap_or_else(|| "no poster".to_string());
        out.push_str(&format!(
            "  {}. {} ({} searches)  {poster}\n",
            rank + 1,
            entry.search_term,
            entry.search_count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use marquee_core::MovieRecord;

    use super::*;

    fn settled(query: &str) -> SearchView {
        SearchView {
            query: query.to_string(),
            movies: vec![MovieRecord::new(1, "Batman")],
            ..SearchView::default()
        }
    }

    #[tokio::test]
    async fn test_follow_views_emits_final_change_after_close() {
        let (sender, updates) = watch::channel(SearchView::default());
        let mut refreshed = settled("batman");
        refreshed.trending = vec![TrendEntry {
            id: 1,
            search_term: "batman".to_string(),
            search_count: 2,
            poster_url: None,
        }];
        sender.send_replace(refreshed.clone());
        drop(sender);

        let mut emitted = Vec::new();
        follow_views(updates, |view| emitted.push(view.clone())).await;

        assert_eq!(emitted, vec![refreshed]);
    }

    #[tokio::test]
    async fn test_follow_views_skips_loading_and_repeats() {
        let (sender, updates) = watch::channel(SearchView::default());
        let follower = tokio::spawn(async move {
            let mut emitted = Vec::new();
            follow_views(updates, |view| emitted.push(view.query.clone())).await;
            emitted
        });

        let loading = SearchView {
            is_loading: true,
            ..settled("heat")
        };
        for view in [loading, settled("heat"), settled("heat"), settled("alien")] {
            sender.send_replace(view);
            tokio::task::yield_now().await;
        }
        drop(sender);

        let emitted = follower.await.unwrap();
        assert_eq!(emitted.last().map(String::as_str), Some("alien"));
        assert!(emitted.iter().filter(|q| *q == "heat").count() <= 1);
    }

    #[test]
    fn test_render_results_with_posters() {
        let images = ImageConfig::default();
        let view = SearchView {
            query: "batman".to_string(),
            movies: vec![MovieRecord::new(1, "Batman").with_poster("/bat.jpg")],
            ..SearchView::default()
        };

        let out = render_view(&view, &images);
        assert!(out.contains("Results for \"batman\""));
        assert!(out.contains("https://image.tmdb.org/t/p/w500/bat.jpg"));
        assert!(!out.contains("Trending"));
    }

    #[test]
    fn test_render_error_hides_movies() {
        let view = SearchView {
            error_message: Some("Error fetching movies. Please try again later.".to_string()),
            ..SearchView::default()
        };

        let out = render_view(&view, &ImageConfig::default());
        assert!(out.contains("Popular movies"));
        assert!(out.contains("Please try again later"));
        assert!(!out.contains("No movies found"));
    }

    #[test]
    fn test_render_trending_uses_small_posters() {
        let entries = vec![TrendEntry {
            id: 1,
            search_term: "batman".to_string(),
            search_count: 3,
            poster_url: Some("/bat.jpg".to_string()),
        }];

        let out = render_trending(&entries, &ImageConfig::default());
        assert!(out.contains("1. batman (3 searches)"));
        assert!(out.contains("https://image.tmdb.org/t/p/w200/bat.jpg"));
    }
}
