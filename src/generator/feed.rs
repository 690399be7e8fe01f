//! Atom feed generation

use chrono::{DateTime, Datelike, Utc};

use crate::config::SiteConfig;
use crate::content::PostRecord;
use crate::helpers::{
    date_xml, escape_cdata, escape_feed_text, parse_post_date, strip_invalid_xml_chars,
};

/// Render the Atom feed for `posts`, which must already be newest first
///
/// `now` stamps the copyright year, and the feed `<updated>` when there are
/// no posts.
pub fn atom_feed(config: &SiteConfig, posts: &[PostRecord], now: DateTime<Utc>) -> String {
    let base_url = config.base_url();
    let feed_url = format!("{}/{}", base_url, config.feed.path.trim_start_matches('/'));
    let updated = posts
        .first()
        .map(|post| feed_date(&post.published))
        .unwrap_or_else(|| date_xml(&now));

    let mut feed = String::with_capacity(4096 + posts.len() * 1024);
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8" ?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!(
        "  <title>{}</title>\n",
        escape_feed_text(&config.title)
    ));
    feed.push_str(&format!(
        "  <subtitle>{}</subtitle>\n",
        escape_feed_text(&config.subtitle)
    ));
    feed.push_str(&format!(
        "  <link rel=\"alternate\" type=\"text/html\" href=\"{}/\"/>\n",
        base_url
    ));
    feed.push_str(&format!(
        "  <link rel=\"self\" type=\"application/atom+xml\" href=\"{}\"/>\n",
        feed_url
    ));
    feed.push_str(&format!("  <id>{}</id>\n", feed_url));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated));
    feed.push_str(&format!(
        "  <rights>Copyright © {}, {}</rights>\n",
        now.year(),
        escape_feed_text(&config.author)
    ));

    for post in posts {
        feed.push_str("  <entry>\n");
        feed.push_str(&format!(
            "    <title>{}</title>\n",
            escape_feed_text(post.title())
        ));
        feed.push_str(&format!(
            "    <id>{}/blog/{}</id>\n",
            base_url,
            escape_feed_text(&post.slug)
        ));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            feed_date(&post.published)
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            feed_date(&post.updated)
        ));
        feed.push_str(&format!(
            "    <author>\n      <name>{}</name>\n      <uri>{}</uri>\n    </author>\n",
            escape_feed_text(&config.author),
            escape_feed_text(&config.author_uri)
        ));
        if let Some(tagline) = post.tagline() {
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_feed_text(tagline)
            ));
        }
        feed.push_str(&format!(
            "    <content type=\"html\" xml:base=\"{}\" xml:lang=\"{}\">\n",
            base_url,
            escape_feed_text(&config.language)
        ));
        feed.push_str(&format!(
            "      <![CDATA[ {} ]]>\n",
            escape_cdata(&strip_invalid_xml_chars(&post.html))
        ));
        feed.push_str("    </content>\n");
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// ISO timestamp for a post date, or the escaped raw value if it does not parse
fn feed_date(date: &str) -> String {
    match parse_post_date(date) {
        Some(dt) => date_xml(&dt),
        None => {
            tracing::warn!("Unrecognised post date in feed: {:?}", date);
            escape_feed_text(date)
        }
    }
}
