// src/render.rs
//! Plain-text views the host shell shows for a feed list and one article.

use std::fmt::Write as _;

use crate::ingest::sanitize::{sanitize, sanitize_indented};
use crate::ingest::types::{Article, Comment};

const RULE_WIDTH: usize = 50;
const INDENT: &str = "   ";

/// List entry label: `"{publish_time} {title}"`.
pub fn list_label(article: &Article) -> String {
    format!("{} {}", article.publish_time, article.title)
}

/// One `author:\n{content}\n` block per comment, separated by a blank line.
pub fn render_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("{}:\n{}\n", c.author, sanitize(&c.content)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail view. `comments` is `None` when there is no comment section to show
/// (non-forum article, or the comment fetch failed).
pub fn render_detail(article: &Article, comments: Option<&[Comment]>) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // writeln! into a String cannot fail.
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "\n{}\n", article.title);
    let _ = writeln!(out, "{heavy}");

    let _ = writeln!(out, "\nPublished");
    let _ = writeln!(out, "{INDENT}{}", article.publish_time);

    let _ = writeln!(out, "\nLink");
    let _ = writeln!(out, "{INDENT}{}", article.link);

    let _ = writeln!(out, "\nContent");
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "{}", sanitize_indented(&article.content, INDENT));
    let _ = writeln!(out, "\n{heavy}");

    if let Some(comments) = comments {
        let _ = writeln!(out, "\nComments");
        let _ = writeln!(out, "{light}");
        let _ = writeln!(out, "{}", render_comments(comments));
    }
    out
}
