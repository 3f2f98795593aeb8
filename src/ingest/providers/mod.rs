// src/ingest/providers/mod.rs
//! One adapter per feed schema. Each maps the generic XML tree into
//! [`Article`]s and owns all quirks of its source.

pub mod forum_atom;
pub mod generic_rss;
pub mod telegraph_atom;

use crate::error::FeedError;
use crate::ingest::types::{Article, SourceKey};
use crate::ingest::xml::{XmlNode, XmlValue};

pub use forum_atom::ForumAtomAdapter;
pub use generic_rss::GenericRssAdapter;
pub use telegraph_atom::TelegraphAtomAdapter;

pub trait FeedAdapter: Send + Sync {
    fn source_key(&self) -> SourceKey;

    /// Map a normalized document into articles. Fails only when the root path
    /// is absent; missing leaf fields default to empty strings.
    fn adapt(&self, doc: &XmlNode) -> Result<Vec<Article>, FeedError>;
}

/// Resolve `path` or fail with `UnexpectedFeedShape`. A path that resolves to
/// an empty sequence counts as absent.
pub(crate) fn root_entries<'a>(
    doc: &'a XmlNode,
    source_key: SourceKey,
    path: &[&str],
    display_path: &'static str,
) -> Result<&'a [XmlValue], FeedError> {
    match doc.path(path) {
        Some(v) if !v.is_empty_seq() => Ok(v.items()),
        _ => Err(FeedError::UnexpectedFeedShape {
            source_key,
            path: display_path,
        }),
    }
}

/// Atom-style `published` handling shared by both Atom adapters.
pub(crate) fn entry_publish_time(entry: &XmlValue) -> String {
    crate::ingest::time_fmt::format_publish_time(&entry.child_text("published"))
}
