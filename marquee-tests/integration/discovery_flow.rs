//! End-to-end discovery flow: provider search, trend report, trending refresh.

use std::time::Duration;

use marquee_search::spawn_debouncer;
use mockito::Matcher;

use crate::support::{BATMAN_PAGE, POPULAR_PAGE, RunningTracker, orchestrator};

#[tokio::test]
async fn test_batman_search_reports_and_refreshes_trending() {
    let mut provider = mockito::Server::new_async().await;
    let search = provider
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "batman".into()))
        .with_status(200)
        .with_body(BATMAN_PAGE)
        .create_async()
        .await;
    let tracker = RunningTracker::start().await;

    let orchestrator = orchestrator(&provider.url(), &tracker.base_url);
    orchestrator.on_query_changed("batman").await;

    search.assert_async().await;
    let view = orchestrator.view();
    let ids: Vec<u64> = view.movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(view.error_message, None);

    assert_eq!(view.trending.len(), 1);
    assert_eq!(view.trending[0].id, 1);
    assert_eq!(view.trending[0].search_term, "batman");
    assert_eq!(view.trending[0].search_count, 1);
    assert_eq!(view.trending[0].poster_url.as_deref(), Some("/bat.jpg"));

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_empty_query_lists_popular_without_report() {
    let mut provider = mockito::Server::new_async().await;
    let discover = provider
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()))
        .with_status(200)
        .with_body(POPULAR_PAGE)
        .create_async()
        .await;
    let tracker = RunningTracker::start().await;

    let orchestrator = orchestrator(&provider.url(), &tracker.base_url);
    orchestrator.on_mounted().await;

    discover.assert_async().await;
    let view = orchestrator.view();
    assert_eq!(view.movies[0].title, "Interstellar");
    assert!(view.trending.is_empty());
    assert_eq!(tracker.state.store.len().await, 0);

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_provider_error_shows_message() {
    let mut provider = mockito::Server::new_async().await;
    let _search = provider
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let tracker = RunningTracker::start().await;

    let orchestrator = orchestrator(&provider.url(), &tracker.base_url);
    orchestrator.on_query_changed("batman").await;

    let view = orchestrator.view();
    assert!(view.movies.is_empty());
    assert!(!view.is_loading);
    assert_eq!(
        view.error_message.as_deref(),
        Some("Error fetching movies. Please try again later.")
    );
    assert_eq!(tracker.state.store.len().await, 0);

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_repeated_searches_rank_trending() {
    let mut provider = mockito::Server::new_async().await;
    let _search = provider
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(BATMAN_PAGE)
        .expect_at_least(1)
        .create_async()
        .await;
    let tracker = RunningTracker::start().await;

    let orchestrator = orchestrator(&provider.url(), &tracker.base_url);
    for query in ["heat", "batman", "batman", "alien", "batman"] {
        orchestrator.on_query_changed(query).await;
    }

    let ranked: Vec<(String, u64)> = orchestrator
        .view()
        .trending
        .into_iter()
        .map(|e| (e.search_term, e.search_count))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("batman".to_string(), 3),
            ("heat".to_string(), 1),
            ("alien".to_string(), 1),
        ]
    );

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_tracker_down_keeps_results() {
    let mut provider = mockito::Server::new_async().await;
    let _search = provider
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(BATMAN_PAGE)
        .create_async()
        .await;

    let orchestrator = orchestrator(&provider.url(), "http://127.0.0.1:1");
    orchestrator.on_mounted().await;
    orchestrator.on_query_changed("batman").await;

    let view = orchestrator.view();
    assert_eq!(view.movies.len(), 2);
    assert_eq!(view.error_message, None);
    assert!(view.trending.is_empty());
}

#[tokio::test]
async fn test_debounced_input_searches_final_text_only() {
    let mut provider = mockito::Server::new_async().await;
    let final_search = provider
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "batman".into()))
        .with_status(200)
        .with_body(BATMAN_PAGE)
        .expect(1)
        .create_async()
        .await;
    let tracker = RunningTracker::start().await;

    let orchestrator = orchestrator(&provider.url(), &tracker.base_url);
    let (input, settled) = spawn_debouncer::<String>(Duration::from_millis(200));
    let driver = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.run_settled_queries(settled).await }
    });

    for text in ["b", "ba", "bat", "batm", "batma", "batman"] {
        input.push(text.to_string()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(final_search.matched_async().await);

    drop(input);
    driver.await.unwrap();

    final_search.assert_async().await;
    assert_eq!(tracker.state.store.count("batman").await, Some(1));

    tracker.shutdown().await;
}
