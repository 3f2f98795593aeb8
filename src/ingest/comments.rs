// src/ingest/comments.rs
//! On-demand comment loading for forum articles.

use metrics::counter;

use crate::error::FeedError;
use crate::ingest::config::FeedTable;
use crate::ingest::fetch::FetchClient;
use crate::ingest::types::{Comment, SourceKey};
use crate::ingest::xml::{normalize, XmlValue};

/// Comment feed URL for `external_id` under the forum descriptor's base URL.
pub fn comment_feed_url(table: &FeedTable, external_id: &str) -> Result<String, FeedError> {
    let base = table
        .get(SourceKey::Forum)
        .and_then(|d| d.comment_feed_base_url.as_deref())
        .ok_or_else(|| {
            FeedError::Configuration("forum comment feed base url is not configured".to_string())
        })?;
    Ok(format!("{}/{}", base.trim_end_matches('/'), external_id))
}

/// Fetch and map the comment feed of one forum article.
///
/// Absent `external_id` returns immediately without I/O. A comment feed with
/// no `rss.channel[0].item` means "no comments yet" and is not an error.
pub async fn fetch_comments(
    client: &dyn FetchClient,
    table: &FeedTable,
    external_id: Option<&str>,
) -> Result<Vec<Comment>, FeedError> {
    let Some(external_id) = external_id.filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };
    let url = comment_feed_url(table, external_id)?;

    counter!("comment_fetch_total").increment(1);
    let body = client.get(&url).await?;
    let comments = parse_comments(&body)?;

    counter!("comments_total").increment(comments.len() as u64);
    tracing::debug!(%external_id, count = comments.len(), "comments loaded");
    Ok(comments)
}

/// Map a comment RSS document. Malformed XML is still an error.
pub fn parse_comments(xml: &str) -> Result<Vec<Comment>, FeedError> {
    let doc = normalize(xml)?;
    let Some(items) = doc
        .path(&["rss", "channel", "item"])
        .filter(|v| !v.is_empty_seq())
    else {
        return Ok(Vec::new());
    };
    Ok(items.items().iter().map(map_item).collect())
}

fn map_item(item: &XmlValue) -> Comment {
    let mut author = item.child_text("author");
    if author.is_empty() {
        author = item.child_text("dc:creator");
    }
    Comment {
        author,
        content: item.child_text("description"),
        title: item.child_text("title"),
        link: item.child_text("link"),
    }
}
