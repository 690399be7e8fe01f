//! Create a new post

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Scaffold `<date>-<slug>.md` in the posts directory
///
/// `date` defaults to today; the slug is derived from the title.
pub fn create_post(blog: &Blog, title: &str, date: Option<&str>) -> Result<PathBuf> {
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", d))?,
        None => chrono::Local::now().date_naive(),
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    fs::create_dir_all(&blog.posts_dir)?;

    let file_path = blog
        .posts_dir
        .join(format!("{}-{}.md", date.format("%Y-%m-%d"), slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let title_yaml = serde_yaml::to_string(title)?;
    let content = format!("---\ntitle: {}tagline: ''\n---\n\n", title_yaml);
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
