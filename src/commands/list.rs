//! List posts

use anyhow::Result;

use crate::content::RenderMode;
use crate::helpers::{format_publish_date, format_title, reading_time_icons};
use crate::Blog;

/// Print every post, newest first
pub async fn run(blog: &Blog) -> Result<()> {
    let posts = blog.loader().load_posts(RenderMode::Metadata).await?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let hidden = if post.is_hidden() { " (hidden)" } else { "" };
        println!(
            "  {} - {} [{}] {} {} min{}",
            format_publish_date(&post.published),
            format_title(post.title()),
            post.slug,
            "☕".repeat(reading_time_icons(post.reading_time)),
            post.reading_time,
            hidden
        );
        let tags = post.tags();
        if !tags.is_empty() {
            println!("      tags: {}", tags.join(", "));
        }
    }

    Ok(())
}
