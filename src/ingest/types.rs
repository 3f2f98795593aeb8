// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which feed schema (and therefore which adapter) a feed uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKey {
    FinancialTelegraph,
    #[default]
    GenericRss,
    Forum,
}

impl SourceKey {
    pub const ALL: [SourceKey; 3] = [
        SourceKey::FinancialTelegraph,
        SourceKey::GenericRss,
        SourceKey::Forum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::FinancialTelegraph => "financial-telegraph",
            SourceKey::GenericRss => "generic-rss",
            SourceKey::Forum => "forum",
        }
    }

    /// Case-insensitive lookup by the kebab-case key.
    pub fn parse(s: &str) -> Option<Self> {
        SourceKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub source_key: SourceKey,
    pub feed_url: String,
    pub display_name: String,
    /// Only the forum source publishes per-article comment feeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_feed_base_url: Option<String>,
}

impl FeedDescriptor {
    pub fn new(source_key: SourceKey, feed_url: &str, display_name: &str) -> Self {
        Self {
            source_key,
            feed_url: feed_url.to_string(),
            display_name: display_name.to_string(),
            comment_feed_base_url: None,
        }
    }

    pub fn with_comment_feed(mut self, base_url: &str) -> Self {
        self.comment_feed_base_url = Some(base_url.to_string());
        self
    }
}

/// Unified output unit of every adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Raw body, possibly HTML. Sanitized only when rendered.
    pub content: String,
    pub id: String,
    /// `YYYY/MM/DD HH:MM:SS` or empty; never the raw feed value.
    pub publish_time: String,
    /// Source that produced the article; forum articles get comments.
    pub source_key: SourceKey,
    /// Forum only: last path segment of `id`, used to locate the comment feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Article {
    pub fn wants_comments(&self) -> bool {
        self.source_key == SourceKey::Forum
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}
