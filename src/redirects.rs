//! Legacy URL redirects
//!
//! The table is the configured static entries followed by one entry per post
//! mapping its bare legacy slug to `/blog/<slug>`. It is built once and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::content::PostRecord;

/// A single redirect rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
    #[serde(default = "default_permanent")]
    pub permanent: bool,
}

fn default_permanent() -> bool {
    true
}

impl Redirect {
    /// Create a permanent (301) redirect
    pub fn permanent(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            permanent: true,
        }
    }

    /// HTTP status code for this redirect
    pub fn status_code(&self) -> u16 {
        if self.permanent {
            301
        } else {
            302
        }
    }
}

/// Immutable lookup table of redirects
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    entries: Vec<Redirect>,
}

impl RedirectTable {
    /// Concatenate the static entries with one generated entry per post
    pub fn new(statics: &[Redirect], posts: &[PostRecord]) -> Self {
        let entries = statics
            .iter()
            .cloned()
            .chain(posts.iter().map(|post| {
                Redirect::permanent(format!("/{}", post.slug), format!("/blog/{}", post.slug))
            }))
            .collect();

        Self { entries }
    }

    /// First redirect whose `from` equals the request path exactly
    pub fn find(&self, path: &str) -> Option<&Redirect> {
        self.entries.iter().find(|r| r.from == path)
    }

    pub fn entries(&self) -> &[Redirect] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
