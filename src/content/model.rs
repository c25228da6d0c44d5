//! Content records: posts, categories and the tag catalog

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A blog post with metadata and raw Markdown body
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Stable identifier, unique across posts
    pub id: String,

    /// URL-safe slug, unique across posts
    pub slug: String,

    /// Display title
    pub title: String,

    /// Short summary shown in listings
    pub description: String,

    /// Id of the owning category
    pub category: String,

    /// Free-form tag labels in declaration order
    pub tags: Vec<String>,

    /// Publication date as `YYYY-MM-DD`
    pub date: String,

    /// Author display name
    pub author: String,

    /// Raw Markdown source (may embed raw HTML)
    pub content: String,

    /// Reading time in minutes, derived from the word count
    pub reading_time: u32,

    /// Cover image path, if the post has one
    pub cover_image: Option<String>,
}

impl Post {
    /// Get the previous post in a list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next post in a list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos < posts.len() - 1 {
            Some(&posts[pos + 1])
        } else {
            None
        }
    }
}

/// A category grouping posts by topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, referenced by `Post::category`
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description shown on category pages
    pub description: String,

    /// URL-safe slug, unique across categories
    pub slug: String,

    /// Cover image path, if the category has one
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// A tag from the tag catalog
///
/// `post_count` is derived: whatever the catalog stores is discarded and
/// the store recounts it from the posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Stable identifier
    pub id: String,

    /// Display name, matched against post tag labels
    pub name: String,

    /// URL-safe slug, unique across tags
    pub slug: String,

    /// Number of posts carrying this tag's name as a label
    #[serde(default)]
    pub post_count: usize,
}

/// One post as declared in the content catalog
///
/// `reading_time` is optional here; the store recomputes it from `content`
/// and warns when a stored value disagrees.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// The full content definition: every category, tag and post the site
/// serves, in declaration order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub posts: Vec<PostRecord>,
}

/// The catalog compiled into the binary
const EMBEDDED_CATALOG: &str = include_str!("catalog.yml");

impl Catalog {
    /// Parse the embedded seed catalog
    pub fn embedded() -> Result<Self> {
        serde_yaml::from_str(EMBEDDED_CATALOG).context("Failed to parse embedded content catalog")
    }

    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content catalog: {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse content catalog: {}", path.display()))
    }
}
