//! Post metadata records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of the `YYYY-MM-DD` prefix on post filenames
const DATE_PREFIX_LEN: usize = 10;

/// Metadata for a single post, as consumed by routes, feeds and sitemaps
///
/// Serializes to `{slug, published, updated, readingTime, html, ...frontMatter}`.
/// Front-matter keys that collide with a computed field replace it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// URL-safe identifier derived from the filename
    pub slug: String,

    /// Publication date (`YYYY-MM-DD`) taken from the filename
    pub published: String,

    /// Last updated date, `published` unless front-matter says otherwise
    pub updated: String,

    /// Estimated reading time in minutes
    #[serde(rename = "readingTime")]
    pub reading_time: u64,

    /// Rendered HTML, empty unless requested
    #[serde(default)]
    pub html: String,

    /// Remaining front-matter fields in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl PostRecord {
    /// Create a record with computed defaults (`updated` = `published`)
    pub fn new(slug: &str, published: &str, reading_time: u64, html: String) -> Self {
        Self {
            slug: slug.to_string(),
            published: published.to_string(),
            updated: published.to_string(),
            reading_time,
            html,
            extra: IndexMap::new(),
        }
    }

    /// Spread front-matter fields over the computed defaults
    ///
    /// Keys naming a computed field replace it in place; everything else is
    /// kept verbatim in `extra`, in document order.
    pub fn merge_front_matter(&mut self, front_matter: IndexMap<String, Value>) {
        for (key, value) in front_matter {
            match key.as_str() {
                "slug" => self.slug = value_to_string(value),
                "published" => self.published = value_to_string(value),
                "updated" => self.updated = value_to_string(value),
                "html" => self.html = value_to_string(value),
                "readingTime" => match minutes_from_value(&value) {
                    Some(minutes) => self.reading_time = minutes,
                    None => tracing::warn!(
                        "Ignoring readingTime for {}: {} is not a number of minutes",
                        self.slug,
                        value
                    ),
                },
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    /// Post title, falling back to the slug
    pub fn title(&self) -> &str {
        self.str_field("title").unwrap_or(&self.slug)
    }

    /// Optional one-line summary
    pub fn tagline(&self) -> Option<&str> {
        self.str_field("tagline")
    }

    /// Whether the post is hidden from listings
    pub fn is_hidden(&self) -> bool {
        self.extra
            .get("hide")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Tags from front-matter (a single string counts as one tag)
    pub fn tags(&self) -> Vec<String> {
        match self.extra.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(tag)) => vec![tag.clone()],
            _ => Vec::new(),
        }
    }

    /// Look up a front-matter string field
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// The same record with the rendered body dropped
    pub fn without_html(&self) -> Self {
        Self {
            html: String::new(),
            ..self.clone()
        }
    }
}

/// Whole minutes from a front-matter override, rounding fractions up
fn minutes_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|m| *m >= 0.0).map(|m| m.ceil() as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(|m| {
            (m >= 0.0 && m.is_finite()).then(|| m.ceil() as u64)
        }),
        _ => None,
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Split a post filename into `(published, slug)`
///
/// The name is `<YYYY-MM-DD>-<slug>.<ext>`. Nothing is validated: short or
/// oddly shaped names give truncated or empty parts rather than an error.
pub fn split_filename(name: &str) -> (String, String) {
    let published: String = name.chars().take(DATE_PREFIX_LEN).collect();
    let rest: String = name.chars().skip(DATE_PREFIX_LEN + 1).collect();
    let slug = match rest.rfind('.') {
        Some(dot) => rest[..dot].to_string(),
        None => rest,
    };
    (published, slug)
}
