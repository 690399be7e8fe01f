//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::redirects::Redirect;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub author_uri: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,

    // Content
    #[serde(default)]
    pub reading: ReadingConfig,

    // Outputs
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Legacy paths that redirect somewhere else
    pub redirects: Vec<Redirect>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "pzuraq".to_string(),
            subtitle: "a blog about (mostly) computery things".to_string(),
            author: "pzuraq".to_string(),
            author_uri: "https://www.pzuraq.com".to_string(),
            language: "en".to_string(),

            url: "https://www.pzuraq.com".to_string(),

            posts_dir: "src/routes/blog/_posts".to_string(),
            public_dir: "public".to_string(),

            reading: ReadingConfig::default(),

            feed: FeedConfig::default(),
            sitemap: SitemapConfig::default(),

            redirects: default_redirects(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reading.words_per_minute == 0 {
            return Err(Error::Config(
                "reading.words_per_minute must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_redirects() -> Vec<Redirect> {
    vec![
        Redirect::permanent(
            "/thinking-with-autotracking-what-makes-a-good-reactive-system",
            "/blog/what-makes-a-good-reactive-system/",
        ),
        Redirect::permanent(
            "/thinking-with-autotracking-what-is-reactivity",
            "/blog/what-is-reactivity/",
        ),
        Redirect::permanent(
            "/coming-soon-in-ember-octane/",
            "/blog/coming-soon-in-ember-octane-part-4-modifiers",
        ),
    ]
}

/// Reading time estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 225,
        }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Route the feed is served from, also used as the feed id
    pub path: String,
    pub cache_control: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "/rss".to_string(),
            cache_control: "max-age=0, s-maxage=3600".to_string(),
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Host used for sitemap locations, falls back to `url` when empty
    pub url: String,
    pub static_pages: Vec<String>,
    pub changefreq: String,
    pub priority: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            url: "https://pzuraq.com".to_string(),
            static_pages: vec![
                String::new(),
                "/art".to_string(),
                "/favs".to_string(),
                "/about".to_string(),
            ],
            changefreq: "daily".to_string(),
            priority: "0.7".to_string(),
        }
    }
}
