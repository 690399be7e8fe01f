//! Front-matter parsing

use indexmap::IndexMap;
use serde_json::Value;

/// Front-matter of a post, keys kept in document order
pub type FrontMatter = IndexMap<String, Value>;

/// Split a markdown document into its YAML front-matter and body
///
/// Documents without a leading `---` ... `---` block have empty front-matter
/// and the whole text as body. Once a block is found it is always parsed: an
/// empty or null block is empty front-matter, anything else must be a YAML
/// mapping or the parser error is returned.
pub fn parse(content: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    let Some(rest) = content.trim_start().strip_prefix("---") else {
        return Ok((FrontMatter::new(), content));
    };
    let rest = rest.trim_start_matches(['\n', '\r']);

    let (yaml_content, remaining) = if let Some(body) = rest.strip_prefix("---") {
        // Empty block: `---\n---`
        ("", body)
    } else if let Some(end_pos) = rest.find("\n---") {
        (&rest[..end_pos], &rest[end_pos + 4..])
    } else {
        return Ok((FrontMatter::new(), content));
    };
    let remaining = remaining.trim_start_matches(['\n', '\r']);

    if yaml_content.trim().is_empty() {
        return Ok((FrontMatter::new(), remaining));
    }

    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    if value.is_null() {
        return Ok((FrontMatter::new(), remaining));
    }

    let front_matter: FrontMatter = serde_yaml::from_value(value)?;
    Ok((front_matter, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
tagline: "A first post"
hide: false
tags:
  - rust
  - blog
---

This is the content.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm["title"], json!("Hello World"));
        assert_eq!(fm["tagline"], json!("A first post"));
        assert_eq!(fm["hide"], json!(false));
        assert_eq!(fm["tags"], json!(["rust", "blog"]));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_keys_keep_document_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\nbody";
        let (fm, _) = parse(content).unwrap();
        let keys: Vec<&str> = fm.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unquoted_date_stays_string() {
        let (fm, _) = parse("---\nupdated: 2023-02-01\n---\n").unwrap();
        assert_eq!(fm["updated"], json!("2023-02-01"));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (fm, body) = parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = parse("---\n---\nBody text").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_null_block_is_empty() {
        let (fm, body) = parse("---\n~\n---\nBody text").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_quoted_keys() {
        let content = "---\n\"title\": \"Hello\"\n'tags': [a, b]\n---\nBody";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm["title"], json!("Hello"));
        assert_eq!(fm["tags"], json!(["a", "b"]));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_flow_mapping() {
        let (fm, body) = parse("---\n{title: Hello, hide: true}\n---\nBody").unwrap();
        assert_eq!(fm["title"], json!("Hello"));
        assert_eq!(fm["hide"], json!(true));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_malformed_flow_mapping_is_an_error() {
        assert!(parse("---\n{title: [Hello\n---\nBody").is_err());
    }

    #[test]
    fn test_prose_between_rules_is_an_error() {
        let content = "---\n\nSome text with a URL https://example.com/path\n\n---\nMore.\n";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_rule_later_in_document_is_body() {
        let content = "Intro\n\n---\n\nMore content here.\n";
        let (fm, body) = parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_non_mapping_yaml_is_an_error() {
        let content = "---\ntitle: ok\n- item\n---\nbody";
        assert!(parse(content).is_err());
    }
}
