// src/ingest/xml.rs
//! Generic XML tree used by every adapter.
//!
//! `normalize` turns a feed document into nested [`XmlNode`]s where every child
//! element is stored as a [`XmlValue::Seq`], even when it occurs once. Leaf
//! elements without attributes collapse to [`XmlValue::Text`]; anything with
//! attributes or children becomes a [`XmlValue::Node`] whose character data
//! lives in `text`, apart from the attribute map.
//!
//! Adapters must still accept bare (unwrapped) values, so all lookups go
//! through [`XmlValue::first`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

use crate::error::FeedError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    Text(String),
    Node(XmlNode),
    Seq(Vec<XmlValue>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: BTreeMap<String, XmlValue>,
}

impl XmlValue {
    /// Unwraps sequences down to their first scalar or node.
    pub fn first(&self) -> Option<&XmlValue> {
        match self {
            XmlValue::Seq(items) => items.first().and_then(XmlValue::first),
            other => Some(other),
        }
    }

    /// Character data of the first value, whether bare text or a node's text.
    pub fn text(&self) -> Option<&str> {
        match self.first()? {
            XmlValue::Text(s) => Some(s),
            XmlValue::Node(n) => Some(&n.text),
            XmlValue::Seq(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.first()? {
            XmlValue::Node(n) => n.attrs.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlValue> {
        match self.first()? {
            XmlValue::Node(n) => n.child(name),
            _ => None,
        }
    }

    /// Text of a child element, empty when the child is absent.
    pub fn child_text(&self, name: &str) -> String {
        self.child(name)
            .and_then(XmlValue::text)
            .unwrap_or_default()
            .to_string()
    }

    /// All repetitions of this value; a bare value counts as one.
    pub fn items(&self) -> &[XmlValue] {
        match self {
            XmlValue::Seq(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_empty_seq(&self) -> bool {
        matches!(self, XmlValue::Seq(items) if items.is_empty())
    }
}

impl XmlNode {
    pub fn child(&self, name: &str) -> Option<&XmlValue> {
        self.children.get(name)
    }

    /// Walks `names` from this node, taking the first repetition at each step.
    pub fn path(&self, names: &[&str]) -> Option<&XmlValue> {
        let (head, rest) = names.split_first()?;
        let mut cur = self.child(head)?;
        for name in rest {
            cur = cur.child(name)?;
        }
        Some(cur)
    }
}

struct Frame {
    name: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: BTreeMap<String, Vec<XmlValue>>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, FeedError> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut attrs = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| FeedError::MalformedXml(e.to_string()))?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = decode_references(utf8(&attr.value)?)?;
            attrs.insert(key, value);
        }
        Ok(Self {
            name,
            attrs,
            text: String::new(),
            children: BTreeMap::new(),
        })
    }

    fn close(self) -> (String, XmlValue) {
        let text = if self.text.trim().is_empty() {
            String::new()
        } else {
            self.text
        };
        if self.attrs.is_empty() && self.children.is_empty() {
            return (self.name, XmlValue::Text(text));
        }
        let children = self
            .children
            .into_iter()
            .map(|(k, v)| (k, XmlValue::Seq(v)))
            .collect();
        let node = XmlNode {
            attrs: self.attrs,
            text,
            children,
        };
        (self.name, XmlValue::Node(node))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, FeedError> {
    std::str::from_utf8(bytes).map_err(|e| FeedError::MalformedXml(format!("invalid utf-8: {e}")))
}

/// Decode character and entity references in text or an attribute value.
///
/// HTML named entities are accepted alongside the XML ones, but a `&` that
/// does not open a complete, known reference is a syntax error.
fn decode_references(raw: &str) -> Result<String, FeedError> {
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        let tail = &rest[at..];
        let end = tail
            .find(';')
            .filter(|&end| is_known_reference(&tail[1..end]))
            .ok_or_else(|| {
                let shown: String = tail.chars().take(16).collect();
                FeedError::MalformedXml(format!("invalid character reference near `{shown}`"))
            })?;
        rest = &tail[end + 1..];
    }
    Ok(html_escape::decode_html_entities(raw).into_owned())
}

fn is_known_reference(body: &str) -> bool {
    let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = body.strip_prefix('#') {
        if dec.is_empty() || !dec.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        dec.parse::<u32>().ok()
    } else {
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return false;
        }
        // Named entities expand to one or two chars; a longer result means only
        // a legacy prefix like `&amp` matched.
        let reference = format!("&{body};");
        let decoded = html_escape::decode_html_entities(&reference);
        return decoded != reference.as_str() && decoded.chars().count() <= 2;
    };
    code.and_then(char::from_u32).is_some_and(|c| c != '\0')
}

/// Parse `xml` into a document node whose single child is the root element.
pub fn normalize(xml: &str) -> Result<XmlNode, FeedError> {
    let xml = xml.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlValue)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::MalformedXml(format!("{e} (at byte {})", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(FeedError::MalformedXml(
                        "more than one root element".to_string(),
                    ));
                }
                stack.push(Frame::open(&e)?);
            }
            Event::Empty(e) => {
                let closed = Frame::open(&e)?.close();
                attach(&mut stack, &mut root, closed)?;
            }
            Event::End(_) => {
                // quick-xml already checks that end names match.
                let frame = stack.pop().ok_or_else(|| {
                    FeedError::MalformedXml("closing tag without opening tag".to_string())
                })?;
                attach(&mut stack, &mut root, frame.close())?;
            }
            Event::Text(e) => {
                let raw = utf8(&e)?;
                match stack.last_mut() {
                    Some(top) => top.text.push_str(&decode_references(raw)?),
                    None if raw.trim().is_empty() => {}
                    None => {
                        return Err(FeedError::MalformedXml(
                            "non-whitespace text outside the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(e) => {
                let raw = utf8(&e)?;
                match stack.last_mut() {
                    Some(top) => top.text.push_str(raw),
                    None => {
                        return Err(FeedError::MalformedXml(
                            "CDATA outside the root element".to_string(),
                        ))
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::MalformedXml(format!(
            "unexpected end of document, <{}> is not closed",
            open.name
        )));
    }
    let (name, value) =
        root.ok_or_else(|| FeedError::MalformedXml("document has no root element".to_string()))?;

    let mut doc = XmlNode::default();
    doc.children.insert(name, XmlValue::Seq(vec![value]));
    Ok(doc)
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, XmlValue)>,
    (name, value): (String, XmlValue),
) -> Result<(), FeedError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.entry(name).or_default().push(value);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, value));
            Ok(())
        }
        None => Err(FeedError::MalformedXml(
            "more than one root element".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_and_single_elements_are_both_sequences() {
        let doc = normalize(
            r#"<?xml version="1.0"?>
            <rss><channel><title>T</title><item><title>a</title></item><item><title>b</title></item></channel></rss>"#,
        )
        .unwrap();
        let channel = doc.path(&["rss", "channel"]).unwrap();
        assert!(matches!(channel, XmlValue::Seq(v) if v.len() == 1));
        let items = channel.child("item").unwrap();
        assert_eq!(items.items().len(), 2);
        assert_eq!(items.items()[1].child_text("title"), "b");
        assert!(matches!(channel.child("title"), Some(XmlValue::Seq(_))));
    }

    #[test]
    fn attributes_and_text_are_kept_apart() {
        let doc = normalize(
            r#"<feed><entry><link rel="alternate" href="https://x/y"/><content type="html">&lt;p&gt;hi</content></entry></feed>"#,
        )
        .unwrap();
        let entry = doc.path(&["feed", "entry"]).unwrap();
        let link = entry.child("link").unwrap();
        assert_eq!(link.attr("href"), Some("https://x/y"));
        assert_eq!(link.attr("rel"), Some("alternate"));
        assert_eq!(link.text(), Some(""));
        let content = entry.child("content").unwrap();
        assert_eq!(content.text(), Some("<p>hi"));
        assert_eq!(content.attr("type"), Some("html"));
    }

    #[test]
    fn cdata_is_taken_verbatim_and_html_entities_decode() {
        let doc = normalize(
            "<rss><d><![CDATA[<b>x</b> &amp;]]></d><t>a&nbsp;&mdash;b</t></rss>",
        )
        .unwrap();
        let rss = doc.child("rss").unwrap();
        assert_eq!(rss.child_text("d"), "<b>x</b> &amp;");
        assert_eq!(rss.child_text("t"), "a\u{a0}\u{2014}b");
    }

    #[test]
    fn numeric_and_named_references_decode() {
        let doc = normalize(r#"<rss><t>&#65;&#x42;&amp;&quot;&copy;</t><a q="1&amp;2"/></rss>"#)
            .unwrap();
        let rss = doc.child("rss").unwrap();
        assert_eq!(rss.child_text("t"), "AB&\"\u{a9}");
        assert_eq!(rss.child("a").unwrap().attr("q"), Some("1&2"));
    }

    #[test]
    fn bare_values_are_accepted_by_helpers() {
        let mut node = XmlNode::default();
        node.attrs.insert("href".into(), "https://x/y".into());
        let bare = XmlValue::Node(node);
        assert_eq!(bare.attr("href"), Some("https://x/y"));
        assert_eq!(bare.items().len(), 1);
        assert_eq!(XmlValue::Text("t".into()).text(), Some("t"));
        assert_eq!(XmlValue::Seq(vec![]).first(), None);
    }

    #[test]
    fn missing_children_default_to_empty_text() {
        let doc = normalize("<rss><item/></rss>").unwrap();
        let item = doc.path(&["rss", "item"]).unwrap();
        assert_eq!(item.child_text("title"), "");
        assert!(doc.path(&["rss", "channel", "item"]).is_none());
    }

    #[test]
    fn syntax_errors_are_reported_not_truncated() {
        for bad in [
            "",
            "not xml at all",
            "<rss><channel></rss>",
            "<rss><channel>",
            "<a/><b/>",
            "<rss><t>AT&T</t></rss>",
            "<rss><t>AT&T news; more</t></rss>",
            "<rss><t>&bogus;</t></rss>",
            "<rss><t>&ampx;</t></rss>",
            "<rss><t>&#xZZ;</t></rss>",
            "<rss><t>&#;</t></rss>",
            r#"<rss><a href="https://x/?a=1&b=2"/></rss>"#,
        ] {
            match normalize(bad) {
                Err(FeedError::MalformedXml(msg)) => assert!(!msg.is_empty(), "{bad}"),
                other => panic!("expected MalformedXml for {bad:?}, got {other:?}"),
            }
        }
    }
}
