//! Slug → compiled post content, populated once per build

use std::collections::HashMap;

use serde::Serialize;

use crate::content::{ContentLoader, PostRecord, RenderMode};
use crate::error::{Error, Result};

/// What the post route hands to the page renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostContent {
    /// Record with `html` left empty
    pub metadata: PostRecord,
    /// Rendered post body
    pub html: String,
}

impl From<PostRecord> for PostContent {
    fn from(mut post: PostRecord) -> Self {
        let html = std::mem::take(&mut post.html);
        Self {
            metadata: post,
            html,
        }
    }
}

/// Rendered posts indexed by slug, in newest-first order
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    posts: Vec<PostRecord>,
    by_slug: HashMap<String, usize>,
}

impl ContentRegistry {
    /// Index records produced by an HTML extraction pass
    pub fn new(posts: Vec<PostRecord>) -> Self {
        let mut by_slug = HashMap::with_capacity(posts.len());
        for (i, post) in posts.iter().enumerate() {
            if by_slug.contains_key(&post.slug) {
                tracing::warn!("Duplicate slug {:?}, keeping the newer post", post.slug);
                continue;
            }
            by_slug.insert(post.slug.clone(), i);
        }
        Self { posts, by_slug }
    }

    /// Run an HTML extraction pass and index the result
    pub async fn build(loader: &ContentLoader) -> Result<Self> {
        let posts = loader.load_posts(RenderMode::WithHtml).await?;
        Ok(Self::new(posts))
    }

    /// Look a post up by slug
    pub fn get(&self, slug: &str) -> Result<PostContent> {
        self.by_slug
            .get(slug)
            .map(|&i| PostContent::from(self.posts[i].clone()))
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    /// Records including rendered HTML
    pub fn records(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Records as the metadata-only module exposes them
    pub fn metadata(&self) -> Vec<PostRecord> {
        self.posts.iter().map(PostRecord::without_html).collect()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
