//! Virtual data modules
//!
//! Post metadata is addressed by a symbolic identifier rather than a file
//! path. Two identifiers exist: one for metadata only and one that also
//! carries the rendered HTML of each post. Loading either performs a full,
//! independent extraction pass.

mod registry;

pub use registry::{ContentRegistry, PostContent};

use crate::content::{ContentLoader, PostRecord, RenderMode};
use crate::error::Result;

/// Identifier of the metadata-only module
pub const POST_META_ID: &str = "$virtual/post-meta.json";

/// Identifier of the metadata-with-HTML module
pub const POST_META_WITH_HTML_ID: &str = "$virtual/post-meta-with-html.json";

/// A resolvable virtual module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualModule {
    PostMeta,
    PostMetaWithHtml,
}

impl VirtualModule {
    pub const ALL: [VirtualModule; 2] = [VirtualModule::PostMeta, VirtualModule::PostMetaWithHtml];

    /// Resolve an identifier, `None` if it is not one of ours
    pub fn resolve_id(id: &str) -> Option<Self> {
        match id {
            POST_META_ID => Some(Self::PostMeta),
            POST_META_WITH_HTML_ID => Some(Self::PostMetaWithHtml),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::PostMeta => POST_META_ID,
            Self::PostMetaWithHtml => POST_META_WITH_HTML_ID,
        }
    }

    /// File name used when the module is materialised to disk or served
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PostMeta => "post-meta.json",
            Self::PostMetaWithHtml => "post-meta-with-html.json",
        }
    }

    pub fn render_mode(self) -> RenderMode {
        match self {
            Self::PostMeta => RenderMode::Metadata,
            Self::PostMetaWithHtml => RenderMode::WithHtml,
        }
    }

    /// Extract the records this module exposes
    pub async fn records(self, loader: &ContentLoader) -> Result<Vec<PostRecord>> {
        loader.load_posts(self.render_mode()).await
    }

    /// Extract and serialise the module as a JSON array
    pub async fn to_json(self, loader: &ContentLoader) -> Result<String> {
        let records = self.records(loader).await?;
        Ok(serde_json::to_string(&records)?)
    }
}

/// Load a virtual module by identifier
///
/// Returns `None` for identifiers this pipeline does not own, so callers can
/// fall through to other resolvers.
pub async fn load(id: &str, loader: &ContentLoader) -> Option<Result<String>> {
    let module = VirtualModule::resolve_id(id)?;
    Some(module.to_json(loader).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_id() {
        assert_eq!(
            VirtualModule::resolve_id("$virtual/post-meta.json"),
            Some(VirtualModule::PostMeta)
        );
        assert_eq!(
            VirtualModule::resolve_id("$virtual/post-meta-with-html.json"),
            Some(VirtualModule::PostMetaWithHtml)
        );
        assert_eq!(VirtualModule::resolve_id("$virtual/other.json"), None);
        assert_eq!(VirtualModule::resolve_id("post-meta.json"), None);
    }

    #[test]
    fn test_id_round_trip() {
        for module in VirtualModule::ALL {
            assert_eq!(VirtualModule::resolve_id(module.id()), Some(module));
        }
    }

    #[tokio::test]
    async fn test_load_unknown_id() {
        let loader = ContentLoader::with_dir("/definitely/not/here", 225);
        assert!(load("$virtual/unknown.json", &loader).await.is_none());
    }

    #[tokio::test]
    async fn test_load_propagates_missing_directory() {
        let loader = ContentLoader::with_dir("/definitely/not/here", 225);
        let result = load(POST_META_ID, &loader).await.unwrap();
        assert!(result.is_err());
    }
}
