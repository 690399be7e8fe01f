//! Generator module - Atom feed and sitemap text
//!
//! Both generators are pure functions of the site configuration and the
//! ordered post records; callers decide whether to serve or write the result.

mod feed;
mod sitemap;

pub use feed::atom_feed;
pub use sitemap::sitemap;

/// Content type used for both feed and sitemap responses
pub const XML_CONTENT_TYPE: &str = "application/xml";
