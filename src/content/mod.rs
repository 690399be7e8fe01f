//! Content module - post files, front-matter, markdown and metadata extraction

pub mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod reading;

pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, RenderMode};
pub use markdown::MarkdownRenderer;
pub use post::{split_filename, PostRecord};
