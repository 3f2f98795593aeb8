// src/api.rs
//! HTTP surface of the host shell.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::ingest::types::{Article, SourceKey};
use crate::notify::{Notice, NoticeLog};
use crate::render::list_label;
use crate::shell::FeedShell;

#[derive(Clone)]
pub struct AppState {
    pub shell: FeedShell,
    pub notices: Arc<NoticeLog>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/feeds", get(list_feeds))
        .route("/feeds/{key}/refresh", post(refresh_feed))
        .route("/feeds/{key}/articles", get(list_articles))
        .route("/feeds/{key}/articles/{index}", get(article_detail))
        .route("/notices", get(list_notices))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct FeedOut {
    source_key: SourceKey,
    display_name: String,
    feed_url: String,
    has_comments: bool,
    cached: usize,
}

#[derive(Serialize)]
struct ArticleOut {
    index: usize,
    label: String,
    title: String,
    link: String,
    id: String,
    publish_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<String>,
}

#[derive(Serialize)]
struct ArticlesOut {
    source_key: SourceKey,
    count: usize,
    articles: Vec<ArticleOut>,
}

fn summarize(key: SourceKey, articles: &[Article]) -> ArticlesOut {
    let articles = articles
        .iter()
        .enumerate()
        .map(|(index, a)| ArticleOut {
            index,
            label: list_label(a),
            title: a.title.clone(),
            link: a.link.clone(),
            id: a.id.clone(),
            publish_time: a.publish_time.clone(),
            external_id: a.external_id.clone(),
        })
        .collect::<Vec<_>>();
    ArticlesOut {
        source_key: key,
        count: articles.len(),
        articles,
    }
}

fn unknown_key(raw: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("unknown source `{raw}`")).into_response()
}

async fn list_feeds(State(state): State<AppState>) -> Json<Vec<FeedOut>> {
    let out = state
        .shell
        .table()
        .iter()
        .map(|d| FeedOut {
            source_key: d.source_key,
            display_name: d.display_name.clone(),
            feed_url: d.feed_url.clone(),
            has_comments: d.comment_feed_base_url.is_some(),
            cached: state.shell.articles(d.source_key).len(),
        })
        .collect();
    Json(out)
}

async fn refresh_feed(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let Some(sk) = SourceKey::parse(&key) else {
        return unknown_key(&key);
    };
    let articles = state.shell.refresh(sk).await;
    Json(summarize(sk, &articles)).into_response()
}

async fn list_articles(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let Some(sk) = SourceKey::parse(&key) else {
        return unknown_key(&key);
    };
    let articles = state.shell.articles(sk);
    Json(summarize(sk, &articles)).into_response()
}

async fn article_detail(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
) -> Response {
    let Some(sk) = SourceKey::parse(&key) else {
        return unknown_key(&key);
    };
    let Some(article) = state.shell.article(sk, index) else {
        return (StatusCode::NOT_FOUND, format!("no article {index} cached for `{sk}`"))
            .into_response();
    };
    state.shell.open(&article).await.into_response()
}

async fn list_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.notices.snapshot())
}
