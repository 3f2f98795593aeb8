// src/ingest/mod.rs
pub mod comments;
pub mod config;
pub mod dispatch;
pub mod fetch;
pub mod providers;
pub mod sanitize;
pub mod time_fmt;
pub mod types;
pub mod xml;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::error::FeedError;
use crate::ingest::dispatch::AdapterRegistry;
use crate::ingest::fetch::FetchClient;
use crate::ingest::types::{Article, FeedDescriptor};

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_fetch_total", "Feed fetches attempted.");
        describe_counter!("feed_fetch_errors_total", "Feed fetch transport errors.");
        describe_counter!("feed_articles_total", "Articles produced by adapters.");
        describe_counter!(
            "feed_adapt_errors_total",
            "Dispatches that degraded to an empty result."
        );
        describe_histogram!("feed_parse_ms", "Normalize + adapt time in milliseconds.");
        describe_counter!("comment_fetch_total", "Comment feeds requested.");
        describe_counter!("comments_total", "Comments mapped from comment feeds.");
    });
}

/// fetch → normalize → adapt for one feed. Fetch errors propagate unmodified.
pub async fn fetch_feed(
    client: &dyn FetchClient,
    registry: &AdapterRegistry,
    descriptor: &FeedDescriptor,
) -> Result<Vec<Article>, FeedError> {
    ensure_metrics_described();
    counter!("feed_fetch_total").increment(1);

    tracing::debug!(source = %descriptor.source_key, url = %descriptor.feed_url, "fetching feed");
    let body = client.get(&descriptor.feed_url).await?;
    let articles = registry.dispatch(descriptor, &body)?;

    tracing::info!(
        target: "ingest",
        source = %descriptor.source_key,
        count = articles.len(),
        "feed adapted"
    );
    Ok(articles)
}
