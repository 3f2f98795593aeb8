// src/ingest/sanitize.rs
//! HTML body → plain text for detail rendering.

use once_cell::sync::OnceCell;
use regex::Regex;

fn re(cell: &'static OnceCell<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap_or_else(|e| panic!("bad regex {pattern}: {e}")))
}

/// Convert embedded HTML into readable plain text. Never fails.
///
/// Steps run in a fixed order: `<br>` → newline, opening `<p…>` → newline,
/// `</p>` dropped, remaining tags stripped, then the entities `&nbsp;`, `&lt;`,
/// `&gt;`, `&amp;` decoded, then runs of 3+ newlines collapsed to two.
/// Entities are decoded after tag stripping so `&lt;b&gt;` survives as text.
pub fn sanitize(html: &str) -> String {
    static RE_BR: OnceCell<Regex> = OnceCell::new();
    static RE_P_OPEN: OnceCell<Regex> = OnceCell::new();
    static RE_P_CLOSE: OnceCell<Regex> = OnceCell::new();
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    static RE_BLANKS: OnceCell<Regex> = OnceCell::new();

    let out = re(&RE_BR, r"(?i)<br\s*/?>").replace_all(html, "\n");
    // `.` stops at newlines here, so a `<p` tag split across lines is left to RE_TAG.
    let out = re(&RE_P_OPEN, r"(?i)<p.*?>").replace_all(&out, "\n");
    let out = re(&RE_P_CLOSE, r"(?i)</p>").replace_all(&out, "");
    let out = re(&RE_TAG, r"(?s)<.*?>").replace_all(&out, "");

    let out = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    re(&RE_BLANKS, r"\n\s*\n\s*\n")
        .replace_all(&out, "\n\n")
        .into_owned()
}

/// Sanitize and prefix every line with `indent`.
pub fn sanitize_indented(html: &str, indent: &str) -> String {
    sanitize(html)
        .split('\n')
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
