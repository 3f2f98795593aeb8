// src/ingest/time_fmt.rs
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Feed timestamp → unix seconds. RSS uses RFC 2822, Atom RFC 3339.
pub fn parse_to_unix(raw: &str) -> Option<i64> {
    let ts = raw.trim();
    if ts.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc2822) {
        return Some(dt.unix_timestamp());
    }
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc3339) {
        return Some(dt.unix_timestamp());
    }
    // chrono is laxer about obsolete zone names (GMT, EST, ...).
    if let Ok(dt) = DateTime::parse_from_rfc2822(ts) {
        return Some(dt.timestamp());
    }
    // Some generators emit a bare local timestamp.
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.timestamp())
}

/// Format a feed timestamp for display in `tz`. Unparsable input yields "".
pub fn format_publish_time_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    parse_to_unix(raw)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Same as [`format_publish_time_in`] using the process-local timezone.
pub fn format_publish_time(raw: &str) -> String {
    format_publish_time_in(raw, &Local)
}
