// src/ingest/providers/generic_rss.rs
use crate::error::FeedError;
use crate::ingest::time_fmt::format_publish_time;
use crate::ingest::types::{Article, SourceKey};
use crate::ingest::xml::{XmlNode, XmlValue};

use super::{root_entries, FeedAdapter};

/// Plain RSS 2.0: `rss.channel[0].item`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericRssAdapter;

impl GenericRssAdapter {
    fn map_item(item: &XmlValue) -> Article {
        Article {
            title: item.child_text("title"),
            link: item.child_text("link"),
            content: item.child_text("description"),
            id: item.child_text("guid"),
            publish_time: format_publish_time(&item.child_text("pubDate")),
            source_key: SourceKey::GenericRss,
            ..Default::default()
        }
    }
}

impl FeedAdapter for GenericRssAdapter {
    fn source_key(&self) -> SourceKey {
        SourceKey::GenericRss
    }

    fn adapt(&self, doc: &XmlNode) -> Result<Vec<Article>, FeedError> {
        let items = root_entries(
            doc,
            SourceKey::GenericRss,
            &["rss", "channel", "item"],
            "rss.channel[0].item",
        )?;
        Ok(items.iter().map(Self::map_item).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::xml::normalize;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>IT News</title>
    <item>
      <title>First</title>
      <link>https://news.test/1</link>
      <description><![CDATA[<p>Body one</p>]]></description>
      <guid isPermaLink="false">guid-1</guid>
      <pubDate>Fri, 05 Jan 2024 06:03:07 +0000</pubDate>
    </item>
    <item>
      <title>Second</title>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn maps_items_and_defaults_missing_fields() {
        let doc = normalize(RSS).unwrap();
        let out = GenericRssAdapter.adapt(&doc).unwrap();
        assert_eq!(out.len(), 2);

        let a = &out[0];
        assert_eq!(a.title, "First");
        assert_eq!(a.link, "https://news.test/1");
        assert_eq!(a.content, "<p>Body one</p>");
        assert_eq!(a.id, "guid-1");
        assert_eq!(a.publish_time.len(), "YYYY/MM/DD HH:MM:SS".len());
        assert_eq!(a.source_key, SourceKey::GenericRss);
        assert_eq!(a.external_id, None);

        let b = &out[1];
        assert_eq!(b.title, "Second");
        assert_eq!(b.link, "");
        assert_eq!(b.content, "");
        assert_eq!(b.id, "");
        assert_eq!(b.publish_time, "");
    }

    #[test]
    fn channel_without_items_is_a_shape_error() {
        let doc = normalize("<rss><channel><title>x</title></channel></rss>").unwrap();
        let err = GenericRssAdapter.adapt(&doc).unwrap_err();
        assert!(matches!(
            err,
            FeedError::UnexpectedFeedShape { source_key: SourceKey::GenericRss, .. }
        ));
    }

    #[test]
    fn atom_document_is_a_shape_error() {
        let doc = normalize("<feed><entry><id>1</id></entry></feed>").unwrap();
        assert!(GenericRssAdapter.adapt(&doc).is_err());
    }
}
