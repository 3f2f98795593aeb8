// src/ingest/providers/forum_atom.rs
use crate::error::FeedError;
use crate::ingest::types::{Article, SourceKey};
use crate::ingest::xml::{XmlNode, XmlValue};

use super::{entry_publish_time, root_entries, FeedAdapter};

/// Forum Atom feed: `feed.entry`, with comments served from a second feed
/// keyed by the last path segment of each entry id.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForumAtomAdapter;

impl ForumAtomAdapter {
    /// Among several links pick `rel="alternate"`; a single bare link is taken as is.
    fn pick_link(link: Option<&XmlValue>) -> String {
        let href = match link {
            Some(XmlValue::Seq(links)) => links
                .iter()
                .find(|l| l.attr("rel") == Some("alternate"))
                .and_then(|l| l.attr("href")),
            Some(bare) => bare.attr("href"),
            None => None,
        };
        href.unwrap_or_default().to_string()
    }

    fn map_entry(entry: &XmlValue) -> Article {
        let id = entry.child_text("id");
        let external_id = external_id_of(&id);
        Article {
            title: entry.child_text("title"),
            link: Self::pick_link(entry.child("link")),
            content: entry.child_text("content"),
            publish_time: entry_publish_time(entry),
            source_key: SourceKey::Forum,
            external_id,
            id,
            comments: None,
        }
    }
}

/// Last `/`-separated segment of an entry id; `None` when that segment is empty.
pub fn external_id_of(id: &str) -> Option<String> {
    id.rsplit('/')
        .next()
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
}

impl FeedAdapter for ForumAtomAdapter {
    fn source_key(&self) -> SourceKey {
        SourceKey::Forum
    }

    fn adapt(&self, doc: &XmlNode) -> Result<Vec<Article>, FeedError> {
        let entries = root_entries(doc, SourceKey::Forum, &["feed", "entry"], "feed.entry")?;
        Ok(entries.iter().map(Self::map_entry).collect())
    }
}
