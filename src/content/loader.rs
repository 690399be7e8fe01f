//! Post metadata extraction
//!
//! Every pass lists the posts directory, reads and parses all files
//! concurrently, and returns the records newest first. Nothing is cached
//! between passes: each call is a fresh function of the directory contents.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use walkdir::WalkDir;

use super::reading::reading_time;
use super::{frontmatter, split_filename, MarkdownRenderer, PostRecord};
use crate::error::{Error, Result};
use crate::Blog;

lazy_static! {
    // Syntax definitions and themes load once per process
    static ref RENDERER: MarkdownRenderer = MarkdownRenderer::new();
}

/// What a pass produces for each post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Metadata only, `html` left empty
    Metadata,
    /// Metadata plus the body rendered to HTML
    WithHtml,
}

/// Loads post records from the posts directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
    words_per_minute: usize,
}

impl ContentLoader {
    /// Create a loader for a site's configured posts directory
    pub fn new(blog: &Blog) -> Self {
        Self::with_dir(&blog.posts_dir, blog.config.reading.words_per_minute)
    }

    /// Create a loader for an explicit directory
    pub fn with_dir<P: AsRef<Path>>(posts_dir: P, words_per_minute: usize) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            words_per_minute,
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Load every post, newest first
    ///
    /// Fails as a whole if the directory is missing or any single file cannot
    /// be read or parsed.
    pub async fn load_posts(&self, mode: RenderMode) -> Result<Vec<PostRecord>> {
        let entries = self.load_entries(mode).await?;
        Ok(entries.into_iter().map(|(_, post)| post).collect())
    }

    /// Load a single post with its rendered body
    ///
    /// Every file is still read so that front-matter slugs and duplicate
    /// resolution (newest wins) match a full pass, but only the matching file
    /// is rendered.
    pub async fn load_post(&self, slug: &str) -> Result<PostRecord> {
        let (path, _) = self
            .load_entries(RenderMode::Metadata)
            .await?
            .into_iter()
            .find(|(_, post)| post.slug == slug)
            .ok_or_else(|| Error::NotFound(slug.to_string()))?;

        read_post(&path, self.words_per_minute, RenderMode::WithHtml).await
    }

    /// Records paired with their source files, newest first
    async fn load_entries(&self, mode: RenderMode) -> Result<Vec<(PathBuf, PostRecord)>> {
        let files = self.list_files().await?;
        tracing::debug!(
            "Extracting {} posts from {:?} ({:?})",
            files.len(),
            self.posts_dir,
            mode
        );

        let tasks: Vec<_> = files
            .into_iter()
            .map(|path| {
                let words_per_minute = self.words_per_minute;
                tokio::spawn(async move {
                    let post = read_post(&path, words_per_minute, mode).await?;
                    Ok::<_, Error>((path, post))
                })
            })
            .collect();

        let mut entries = Vec::with_capacity(tasks.len());
        let mut pending = tasks.into_iter();
        while let Some(task) = pending.next() {
            match task.await.map_err(Error::from).and_then(|res| res) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    for task in pending {
                        task.abort();
                    }
                    return Err(e);
                }
            }
        }

        // Listing is ascending by filename, and filenames start with the date
        entries.reverse();
        Ok(entries)
    }

    /// File paths in the posts directory, sorted by name
    async fn list_files(&self) -> Result<Vec<PathBuf>> {
        let dir = self.posts_dir.clone();
        tokio::task::spawn_blocking(move || list_post_files(&dir)).await?
    }
}

fn list_post_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::io(dir, e.into()))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Read, parse and derive the record for a single post file
async fn read_post(
    path: &Path,
    words_per_minute: usize,
    mode: RenderMode,
) -> Result<PostRecord> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    let (front_matter, body) =
        frontmatter::parse(&content).map_err(|source| Error::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (published, slug) = split_filename(&file_name);

    let minutes = reading_time(body, words_per_minute);
    let html = match mode {
        RenderMode::WithHtml => RENDERER.render(body),
        RenderMode::Metadata => String::new(),
    };

    let mut post = PostRecord::new(&slug, &published, minutes, html);
    post.merge_front_matter(front_matter);

    tracing::debug!("Loaded post {} ({} min)", post.slug, post.reading_time);
    Ok(post)
}
