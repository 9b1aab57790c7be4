//! Trend tracker HTTP API as seen by external clients.

use marquee_core::TrendEntry;
use marquee_web::TrendStore;
use serde_json::{Value, json};

use crate::support::RunningTracker;

async fn post_report(client: &reqwest::Client, base_url: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/update_search"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_update_search_acknowledges_success() {
    let tracker = RunningTracker::start().await;
    let client = reqwest::Client::new();

    let response = post_report(
        &client,
        &tracker.base_url,
        json!({ "searchTerm": "heat", "movie": { "id": 949, "poster_url": null } }),
    )
    .await;

    assert!(response.status().is_success());
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "success": true }));

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_blank_term_rejected() {
    let tracker = RunningTracker::start().await;
    let client = reqwest::Client::new();

    let response = post_report(
        &client,
        &tracker.base_url,
        json!({ "searchTerm": "", "movie": { "id": 1 } }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(tracker.state.store.len().await, 0);

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_trending_limited_and_ordered() {
    let tracker = RunningTracker::with_store(TrendStore::in_memory(), 3).await;
    let client = reqwest::Client::new();

    for (term, times) in [("a", 1), ("b", 4), ("c", 2), ("d", 3), ("e", 1)] {
        for _ in 0..times {
            post_report(
                &client,
                &tracker.base_url,
                json!({ "searchTerm": term, "movie": { "id": 1, "poster_url": "/p.jpg" } }),
            )
            .await;
        }
    }

    let entries: Vec<TrendEntry> = client
        .get(format!("{}/trending", tracker.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ranked: Vec<(&str, u64)> = entries
        .iter()
        .map(|e| (e.search_term.as_str(), e.search_count))
        .collect();
    assert_eq!(ranked, vec![("b", 4), ("d", 3), ("c", 2)]);

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let tracker = RunningTracker::start().await;
    let client = reqwest::Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("{}/update_search", tracker.base_url))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );

    tracker.shutdown().await;
}

#[tokio::test]
async fn test_counts_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trending.json");
    let client = reqwest::Client::new();

    let tracker = RunningTracker::with_store(TrendStore::open(&path).await.unwrap(), 5).await;
    for _ in 0..2 {
        post_report(
            &client,
            &tracker.base_url,
            json!({ "searchTerm": "batman", "movie": { "id": 1, "poster_url": "/bat.jpg" } }),
        )
        .await;
    }
    tracker.shutdown().await;

    let restarted = RunningTracker::with_store(TrendStore::open(&path).await.unwrap(), 5).await;
    let entries: Vec<TrendEntry> = client
        .get(format!("{}/trending", restarted.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].search_count, 2);
    assert_eq!(entries[0].poster_url.as_deref(), Some("/bat.jpg"));

    restarted.shutdown().await;
}
