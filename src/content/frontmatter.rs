//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Metadata block optionally preceding a Markdown body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,

    /// Additional custom fields, in declaration order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split front-matter from a content string.
    /// Returns (front_matter, body); a missing or unparsable block yields
    /// the default front-matter with the whole input as body.
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.trim_start();

        if content.starts_with("---") {
            Self::parse_yaml(content)
        } else {
            (FrontMatter::default(), content)
        }
    }

    /// True when no field was set and no extra keys were present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_empty()
            && self.cover_image.is_none()
            && self.extra.is_empty()
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        // Skip the opening --- fence
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        if let Some(end_pos) = rest.find("\n---") {
            let yaml_content = &rest[..end_pos];
            let remaining = &rest[end_pos + 4..];
            let remaining = remaining.trim_start_matches(['\n', '\r']);

            if yaml_content.trim().is_empty() {
                return (FrontMatter::default(), remaining);
            }

            // A --- pair can also be a Markdown thematic break around prose.
            // Only treat the block as front-matter when at least one line has
            // a "key: value" shape, and the colon is not part of a URL.
            let has_yaml_structure = yaml_content.lines().any(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return false;
                }
                if let Some(colon_pos) = trimmed.find(':') {
                    let before_colon = &trimmed[..colon_pos];
                    let is_valid_key = !before_colon.is_empty()
                        && before_colon
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                        && before_colon != "http"
                        && before_colon != "https"
                        && before_colon != "ftp";
                    if is_valid_key {
                        let after_colon = &trimmed[colon_pos + 1..];
                        return after_colon.is_empty() || after_colon.starts_with(' ');
                    }
                }
                false
            });

            if !has_yaml_structure {
                return (FrontMatter::default(), content);
            }

            match serde_yaml::from_str::<FrontMatter>(yaml_content) {
                Ok(fm) => (fm, remaining),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse YAML front-matter, treating as content: {}",
                        e
                    );
                    (FrontMatter::default(), content)
                }
            }
        } else {
            // No closing fence, the --- was part of the body
            (FrontMatter::default(), content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: 深入理解闭包
date: 2024-01-15
author: CodeGeek
description: 作用域与闭包
tags:
  - javascript
  - 闭包
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("深入理解闭包".to_string()));
        assert_eq!(fm.author, Some("CodeGeek".to_string()));
        assert_eq!(fm.tags, vec!["javascript", "闭包"]);
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome body text.";

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = r#"---
title: Single Tag Post
date: 2024-01-15
tags: Notes
---

Content here.
"#;

        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("Single Tag Post".to_string()));
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let content = "---\ntitle: T\nlayout: wide\nfeatured: true\n---\nBody.";

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.extra.len(), 2);
        assert!(fm.extra.contains_key("layout"));
        assert_eq!(remaining, "Body.");
    }

    #[test]
    fn test_malformed_yaml_falls_back_to_body() {
        let content = "---\ntitle: [unclosed\n---\n\nBody text.";

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert!(remaining.contains("title: [unclosed"));
        assert!(remaining.contains("Body text."));
    }

    #[test]
    fn test_unclosed_fence_is_body() {
        let content = "---\ntitle: Dangling\n\nNo closing fence here.";

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert!(remaining.contains("No closing fence here."));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        // --- used as a thematic break around prose, not front-matter
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert!(remaining.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert!(remaining.contains("https://example.com"));
    }
}
