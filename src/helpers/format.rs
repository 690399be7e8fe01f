//! Display formatting for post titles and reading time

use super::html::NBSP_TOKEN;

/// Replace the `(nbsp)` token in a title with a real non-breaking space
pub fn format_title(title: &str) -> String {
    title.replace(NBSP_TOKEN, "\u{a0}")
}

/// Number of reading-time icons to show for a post
///
/// Buckets: up to 5 minutes is one icon, then 10, 20 and 30 minutes; anything
/// longer gets five.
pub fn reading_time_icons(minutes: u64) -> usize {
    match minutes {
        0..=5 => 1,
        6..=10 => 2,
        11..=20 => 3,
        21..=30 => 4,
        _ => 5,
    }
}
