//! Sitemap generation

use crate::config::SiteConfig;
use crate::content::PostRecord;
use crate::helpers::escape_feed_text;

const SITEMAP_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns", "https://www.sitemaps.org/schemas/sitemap/0.9"),
    ("xmlns:news", "https://www.google.com/schemas/sitemap-news/0.9"),
    ("xmlns:xhtml", "https://www.w3.org/1999/xhtml"),
    ("xmlns:mobile", "https://www.google.com/schemas/sitemap-mobile/1.0"),
    ("xmlns:image", "https://www.google.com/schemas/sitemap-image/1.1"),
    ("xmlns:video", "https://www.google.com/schemas/sitemap-video/1.1"),
];

/// Render sitemap XML: configured static pages, then one URL per post
pub fn sitemap(config: &SiteConfig, posts: &[PostRecord]) -> String {
    let host = if config.sitemap.url.is_empty() {
        config.base_url()
    } else {
        config.sitemap.url.trim_end_matches('/')
    };

    let mut xml = String::with_capacity(1024 + posts.len() * 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" ?>"#);
    xml.push_str("\n<urlset\n");
    for (attr, ns) in SITEMAP_NAMESPACES {
        xml.push_str(&format!("  {}=\"{}\"\n", attr, ns));
    }
    xml.push_str(">\n");

    let locations = config
        .sitemap
        .static_pages
        .iter()
        .map(|page| format!("{}{}", host, page))
        .chain(
            posts
                .iter()
                .map(|post| format!("{}/blog/{}", host, post.slug)),
        );

    for loc in locations {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_feed_text(&loc)));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            config.sitemap.changefreq
        ));
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            config.sitemap.priority
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_static_and_posts() {
        let config = SiteConfig::default();
        let posts = vec![
            PostRecord::new("newer", "2023-06-15", 1, String::new()),
            PostRecord::new("older", "2023-01-01", 1, String::new()),
        ];
        let xml = sitemap(&config, &posts);

        assert_eq!(xml.matches("<url>").count(), 6);
        assert!(xml.contains("<loc>https://pzuraq.com</loc>"));
        assert!(xml.contains("<loc>https://pzuraq.com/about</loc>"));
        assert!(xml.contains("<loc>https://pzuraq.com/blog/newer</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.contains(r#"xmlns="https://www.sitemaps.org/schemas/sitemap/0.9""#));
        assert!(xml.find("/about<").unwrap() < xml.find("/blog/newer<").unwrap());
    }

    #[test]
    fn test_sitemap_falls_back_to_site_url() {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config.sitemap.url = String::new();
        config.sitemap.static_pages = vec!["/".to_string()];
        let xml = sitemap(&config, &[]);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert_eq!(xml.matches("<url>").count(), 1);
    }
}
