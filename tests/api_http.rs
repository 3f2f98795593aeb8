// tests/api_http.rs
//
// HTTP-level tests for the host shell router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use feed_aggregator::ingest::config::FeedTable;
use feed_aggregator::ingest::dispatch::AdapterRegistry;
use feed_aggregator::ingest::fetch::FixtureFetchClient;
use feed_aggregator::{router, AppState, FeedDescriptor, FeedShell, NoticeLog, SourceKey};

const BODY_LIMIT: usize = 1024 * 1024;

const FORUM_URL: &str = "https://forum.example.com/index.xml";
const COMMENT_BASE: &str = "https://comments.example.com/forum";

fn test_router() -> Router {
    let table = FeedTable::new(vec![
        FeedDescriptor::new(SourceKey::GenericRss, "https://news.example.com/rss", "News"),
        FeedDescriptor::new(SourceKey::Forum, FORUM_URL, "Forum").with_comment_feed(COMMENT_BASE),
    ])
    .expect("valid table");
    let client = FixtureFetchClient::new()
        .with(FORUM_URL, include_str!("fixtures/forum_atom.xml"))
        .with(
            &format!("{COMMENT_BASE}/123456"),
            include_str!("fixtures/forum_comments.xml"),
        );
    let notices = Arc::new(NoticeLog::default());
    let shell = FeedShell::new(table, AdapterRegistry::default(), Arc::new(client), notices.clone());
    router(AppState { shell, notices })
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

#[tokio::test]
async fn health_is_ok() {
    let app = test_router();
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "ok");
}

#[tokio::test]
async fn feeds_lists_descriptors() {
    let app = test_router();
    let (status, body) = send(&app, "GET", "/feeds").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1]["source_key"], "forum");
    assert_eq!(arr[1]["has_comments"], true);
    assert_eq!(arr[0]["has_comments"], false);
}

#[tokio::test]
async fn refresh_then_open_detail_with_comments() {
    let app = test_router();

    let (status, body) = send(&app, "POST", "/feeds/forum/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["count"], 2);
    assert_eq!(v["articles"][0]["external_id"], "123456");

    let (status, body) = send(&app, "GET", "/feeds/forum/articles").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["count"], 2);

    let (status, body) = send(&app, "GET", "/feeds/forum/articles/0").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("Which laptop for Rust development?"));
    assert!(text.contains("erin:"));
}

#[tokio::test]
async fn failed_refresh_is_a_notice_not_an_http_error() {
    let app = test_router();
    // No fixture for the news feed URL.
    let (status, body) = send(&app, "POST", "/feeds/generic-rss/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["count"], 0);

    let (_, body) = send(&app, "GET", "/notices").await;
    let v: Json = serde_json::from_slice(&body).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["level"], "error");
}

#[tokio::test]
async fn unknown_key_and_index_are_404() {
    let app = test_router();
    let (status, _) = send(&app, "POST", "/feeds/podcast/refresh").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/feeds/forum/articles/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
