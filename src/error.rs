// src/error.rs
//! Error taxonomy for the feed pipeline.

use thiserror::Error;

use crate::ingest::types::SourceKey;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure reported by the fetch client (timeout, DNS, non-2xx).
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The payload is not well-formed XML.
    #[error("malformed xml: {0}")]
    MalformedXml(String),

    /// The document parsed but the adapter's root path is missing.
    #[error("unexpected {source_key} feed shape: `{path}` not found")]
    UnexpectedFeedShape { source_key: SourceKey, path: &'static str },

    /// No adapter is registered for the descriptor's source key.
    #[error("no adapter registered for source `{0}`")]
    UnknownSource(String),

    /// A required descriptor or config field is missing; retrying won't help.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FeedError {
    pub fn fetch(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        FeedError::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Structural failures that the host degrades to an empty result.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FeedError::MalformedXml(_)
                | FeedError::UnexpectedFeedShape { .. }
                | FeedError::UnknownSource(_)
        )
    }

    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Fetch { .. } => "fetch",
            FeedError::MalformedXml(_) => "malformed_xml",
            FeedError::UnexpectedFeedShape { .. } => "unexpected_shape",
            FeedError::UnknownSource(_) => "unknown_source",
            FeedError::Configuration(_) => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_keeps_url_and_source_message() {
        let e = FeedError::fetch("https://x.test/feed", "connection refused");
        let msg = e.to_string();
        assert!(msg.contains("https://x.test/feed"));
        assert!(msg.contains("connection refused"));
        assert!(std::error::Error::source(&e).is_some());
        assert!(!e.is_recoverable());
    }

    #[test]
    fn shape_error_names_source_and_path() {
        let e = FeedError::UnexpectedFeedShape {
            source_key: SourceKey::GenericRss,
            path: "rss.channel[0].item",
        };
        assert_eq!(
            e.to_string(),
            "unexpected generic-rss feed shape: `rss.channel[0].item` not found"
        );
        assert!(e.is_recoverable());
        assert_eq!(e.kind(), "unexpected_shape");
    }
}
