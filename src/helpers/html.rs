//! HTML / XML escaping helpers

/// Literal token authors write in titles where a non-breaking space belongs
pub const NBSP_TOKEN: &str = "(nbsp)";

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape a post field for inclusion in feed XML
///
/// The `(nbsp)` token becomes a plain space, then the five XML special
/// characters are replaced by entities. `&` goes first so the entities
/// produced for the other characters survive intact.
pub fn escape_feed_text(s: &str) -> String {
    s.replace(NBSP_TOKEN, " ")
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Keep CDATA content well-formed by splitting any `]]>` terminator
pub fn escape_cdata(s: &str) -> String {
    s.replace("]]>", "]]]]><![CDATA[>")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_feed_text() {
        assert_eq!(
            escape_feed_text(r#"Q&A: "<T>" isn't(nbsp)hard"#),
            "Q&amp;A: &quot;&lt;T&gt;&quot; isn&apos;t hard"
        );
    }

    #[test]
    fn test_escape_feed_text_no_double_escape() {
        assert_eq!(escape_feed_text("<"), "&lt;");
        assert_eq!(escape_feed_text("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_cdata() {
        assert_eq!(escape_cdata("a]]>b"), "a]]]]><![CDATA[>b");
        assert_eq!(escape_cdata("<p>ok</p>"), "<p>ok</p>");
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{1b}c\n"), "abc\n");
    }
}
