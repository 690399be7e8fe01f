//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a post date (`published` / `updated`) as UTC
///
/// Bare dates are midnight UTC, matching how the feed has always dated posts.
pub fn parse_post_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Format a timestamp like `Date.prototype.toISOString` (`2023-01-01T00:00:00.000Z`)
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Format a post date for display, e.g. `January 5, 2023`
///
/// Input that is not a recognisable date is returned unchanged.
pub fn format_publish_date(date: &str) -> String {
    match parse_post_date(date) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}
