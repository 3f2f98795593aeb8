// src/ingest/providers/telegraph_atom.rs
use crate::error::FeedError;
use crate::ingest::types::{Article, SourceKey};
use crate::ingest::xml::{XmlNode, XmlValue};

use super::{entry_publish_time, root_entries, FeedAdapter};

/// Financial-news telegraph Atom feed: `feed.entry`.
///
/// `link` comes from the first link's `href`; `content` is the text of the
/// (usually `type="html"`) content element.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelegraphAtomAdapter;

impl TelegraphAtomAdapter {
    /// `content` is usually a node with `type="html"`, but an attribute-less
    /// text element is read as well rather than dropped.
    fn map_entry(entry: &XmlValue) -> Article {
        let link = entry
            .child("link")
            .and_then(|l| l.attr("href"))
            .unwrap_or_default()
            .to_string();

        Article {
            title: entry.child_text("title"),
            link,
            content: entry.child_text("content"),
            id: entry.child_text("id"),
            publish_time: entry_publish_time(entry),
            source_key: SourceKey::FinancialTelegraph,
            ..Default::default()
        }
    }
}

impl FeedAdapter for TelegraphAtomAdapter {
    fn source_key(&self) -> SourceKey {
        SourceKey::FinancialTelegraph
    }

    fn adapt(&self, doc: &XmlNode) -> Result<Vec<Article>, FeedError> {
        let entries = root_entries(
            doc,
            SourceKey::FinancialTelegraph,
            &["feed", "entry"],
            "feed.entry",
        )?;
        Ok(entries.iter().map(Self::map_entry).collect())
    }
}
