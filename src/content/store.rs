//! Validated, immutable content store

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::content::frontmatter::FrontMatter;
use crate::content::markdown;
use crate::content::model::{Catalog, Category, Post, PostRecord, Tag};

/// A structural problem in the content catalog.
///
/// Any of these is fatal at load: the store refuses to construct rather
/// than serve a partially consistent view.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("duplicate {kind} slug {slug:?}")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("post {post:?} references unknown category {category:?}")]
    UnknownCategory { post: String, category: String },

    #[error("{kind} slug {slug:?} is not URL-safe")]
    InvalidSlug { kind: &'static str, slug: String },

    #[error("post {post:?} has date {date:?}, expected YYYY-MM-DD")]
    InvalidDate { post: String, date: String },

    #[error("{kind} {id:?} has an empty {field}")]
    EmptyField {
        kind: &'static str,
        id: String,
        field: &'static str,
    },
}

/// The authoritative collection of posts, categories and tags.
///
/// Built once at startup from a [`Catalog`] and never mutated afterwards.
/// All accessors are read-only; lookups that can miss return `Option`.
#[derive(Debug)]
pub struct ContentStore {
    posts: Vec<Post>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    post_slugs: HashMap<String, usize>,
    category_slugs: HashMap<String, usize>,
    category_ids: HashMap<String, usize>,
}

impl ContentStore {
    /// Validate a catalog and build the store from it.
    ///
    /// Derived fields are recomputed here: a stored reading time that
    /// disagrees with the word count is replaced (with a warning), and tag
    /// post counts are always recounted from the posts.
    pub fn from_catalog(catalog: Catalog) -> Result<Self, IntegrityError> {
        let categories = catalog.categories;
        let mut category_slugs = HashMap::new();
        let mut category_ids = HashMap::new();

        for (idx, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(IntegrityError::EmptyField {
                    kind: "category",
                    id: category.id.clone(),
                    field: "name",
                });
            }
            check_slug("category", &category.slug)?;
            if category_ids.insert(category.id.clone(), idx).is_some() {
                return Err(IntegrityError::DuplicateId {
                    kind: "category",
                    id: category.id.clone(),
                });
            }
            if category_slugs.insert(category.slug.clone(), idx).is_some() {
                return Err(IntegrityError::DuplicateSlug {
                    kind: "category",
                    slug: category.slug.clone(),
                });
            }
        }

        let mut tags = catalog.tags;
        let mut tag_ids = HashSet::new();
        let mut tag_slugs = HashSet::new();
        for tag in &tags {
            check_slug("tag", &tag.slug)?;
            if !tag_ids.insert(tag.id.clone()) {
                return Err(IntegrityError::DuplicateId {
                    kind: "tag",
                    id: tag.id.clone(),
                });
            }
            if !tag_slugs.insert(tag.slug.clone()) {
                return Err(IntegrityError::DuplicateSlug {
                    kind: "tag",
                    slug: tag.slug.clone(),
                });
            }
        }

        let mut posts = Vec::with_capacity(catalog.posts.len());
        let mut post_slugs = HashMap::new();
        let mut post_ids = HashSet::new();

        for record in catalog.posts {
            let post = validate_post(record, &category_ids)?;
            if !post_ids.insert(post.id.clone()) {
                return Err(IntegrityError::DuplicateId {
                    kind: "post",
                    id: post.id,
                });
            }
            if post_slugs.insert(post.slug.clone(), posts.len()).is_some() {
                return Err(IntegrityError::DuplicateSlug {
                    kind: "post",
                    slug: post.slug,
                });
            }
            posts.push(post);
        }

        // postCount on a tag is never trusted as stored; labels match the
        // tag name case-insensitively
        for tag in &mut tags {
            let name = tag.name.to_lowercase();
            tag.post_count = posts
                .iter()
                .filter(|post| post.tags.iter().any(|label| label.to_lowercase() == name))
                .count();
        }

        Ok(Self {
            posts,
            categories,
            tags,
            post_slugs,
            category_slugs,
            category_ids,
        })
    }

    /// Every post, in catalog declaration order.
    /// Not sorted by date; chronological ordering is the caller's concern.
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    /// Every category, in declaration order
    pub fn all_categories(&self) -> &[Category] {
        &self.categories
    }

    /// The tag catalog with recomputed post counts
    pub fn all_tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Look up a post by its slug
    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.post_slugs.get(slug).map(|&idx| &self.posts[idx])
    }

    /// Look up a category by its slug
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.category_slugs
            .get(slug)
            .map(|&idx| &self.categories[idx])
    }

    /// Look up a category by its id
    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.category_ids.get(id).map(|&idx| &self.categories[idx])
    }

    /// Posts belonging to a category, in declaration order.
    /// An id matching no post yields an empty list, not an error.
    pub fn posts_by_category(&self, category_id: &str) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| post.category == category_id)
            .collect()
    }
}

/// Validate one post record and finish it into a domain post
fn validate_post(
    record: PostRecord,
    category_ids: &HashMap<String, usize>,
) -> Result<Post, IntegrityError> {
    if record.title.trim().is_empty() {
        return Err(IntegrityError::EmptyField {
            kind: "post",
            id: record.id,
            field: "title",
        });
    }
    if record.description.trim().is_empty() {
        return Err(IntegrityError::EmptyField {
            kind: "post",
            id: record.id,
            field: "description",
        });
    }
    check_slug("post", &record.slug)?;
    if NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err() {
        return Err(IntegrityError::InvalidDate {
            post: record.id,
            date: record.date,
        });
    }
    if !category_ids.contains_key(&record.category) {
        return Err(IntegrityError::UnknownCategory {
            post: record.id,
            category: record.category,
        });
    }

    // The body after any front-matter is what the renderer counts
    let (_, body) = FrontMatter::parse(&record.content);
    let computed = markdown::reading_time(body);
    if let Some(stored) = record.reading_time {
        if stored != computed {
            tracing::warn!(
                "post {}: stored reading time {} is stale, recomputed {}",
                record.id,
                stored,
                computed
            );
        }
    }

    Ok(Post {
        id: record.id,
        slug: record.slug,
        title: record.title,
        description: record.description,
        category: record.category,
        tags: record.tags,
        date: record.date,
        author: record.author,
        content: record.content,
        reading_time: computed,
        cover_image: record.cover_image,
    })
}

fn check_slug(kind: &'static str, value: &str) -> Result<(), IntegrityError> {
    if value.is_empty() || slug::slugify(value) != value {
        return Err(IntegrityError::InvalidSlug {
            kind,
            slug: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from_yaml(yaml: &str) -> Result<ContentStore, IntegrityError> {
        let catalog: Catalog = serde_yaml::from_str(yaml).unwrap();
        ContentStore::from_catalog(catalog)
    }

    const TWO_CATEGORY_CATALOG: &str = r#"
categories:
  - { id: javascript, name: JavaScript, description: JS topics, slug: javascript }
  - { id: vue, name: Vue, description: Vue topics, slug: vue }
tags:
  - { id: javascript, name: JavaScript, slug: javascript }
posts:
  - id: closures
    slug: understanding-closures
    title: Understanding Closures
    description: Scope chains explained
    category: javascript
    tags: [javascript]
    date: "2024-01-15"
    author: CodeGeek
    content: "Closures capture their lexical environment."
  - id: protos
    slug: understanding-prototypes
    title: Understanding Prototypes
    description: The prototype chain
    category: javascript
    tags: [javascript]
    date: "2024-01-16"
    author: CodeGeek
    content: "Lookup walks the prototype chain."
  - id: refs
    slug: vue-refs
    title: Refs in Vue
    description: Reactive references
    category: vue
    tags: [Vue]
    date: "2024-02-01"
    author: CodeGeek
    content: "Refs wrap a value."
"#;

    #[test]
    fn test_store_builds_and_preserves_order() {
        let store = store_from_yaml(TWO_CATEGORY_CATALOG).unwrap();

        let slugs: Vec<&str> = store.all_posts().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "understanding-closures",
                "understanding-prototypes",
                "vue-refs"
            ]
        );
        assert_eq!(store.all_categories().len(), 2);
    }

    #[test]
    fn test_lookups() {
        let store = store_from_yaml(TWO_CATEGORY_CATALOG).unwrap();

        assert_eq!(
            store.post_by_slug("understanding-closures").unwrap().id,
            "closures"
        );
        assert!(store.post_by_slug("missing").is_none());
        assert_eq!(store.category_by_slug("vue").unwrap().id, "vue");
        assert!(store.category_by_slug("missing").is_none());
        assert_eq!(store.category_by_id("javascript").unwrap().slug, "javascript");
    }

    #[test]
    fn test_posts_by_category_in_declared_order() {
        let store = store_from_yaml(TWO_CATEGORY_CATALOG).unwrap();

        let js = store.posts_by_category("javascript");
        assert_eq!(js.len(), 2);
        assert_eq!(js[0].id, "closures");
        assert_eq!(js[1].id, "protos");

        // Unknown id is an empty list, not an error
        assert!(store.posts_by_category("rust").is_empty());
    }

    #[test]
    fn test_duplicate_post_slug_is_fatal() {
        let yaml = r#"
categories:
  - { id: javascript, name: JavaScript, description: JS, slug: javascript }
posts:
  - id: a
    slug: same-slug
    title: First
    description: d
    category: javascript
    date: "2024-01-01"
    author: x
    content: one
  - id: b
    slug: same-slug
    title: Second
    description: d
    category: javascript
    date: "2024-01-02"
    author: x
    content: two
"#;
        let err = store_from_yaml(yaml).unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateSlug { kind: "post", .. }));
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        let yaml = r#"
categories:
  - { id: javascript, name: JavaScript, description: JS, slug: javascript }
posts:
  - id: a
    slug: a-post
    title: Post
    description: d
    category: golang
    date: "2024-01-01"
    author: x
    content: text
"#;
        let err = store_from_yaml(yaml).unwrap_err();
        match err {
            IntegrityError::UnknownCategory { post, category } => {
                assert_eq!(post, "a");
                assert_eq!(category, "golang");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_category_slug_is_fatal() {
        let yaml = r#"
categories:
  - { id: a, name: A, description: d, slug: shared }
  - { id: b, name: B, description: d, slug: shared }
"#;
        let err = store_from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::DuplicateSlug { kind: "category", .. }
        ));
    }

    #[test]
    fn test_invalid_date_is_fatal() {
        let yaml = r#"
categories:
  - { id: c, name: C, description: d, slug: c }
posts:
  - id: a
    slug: a-post
    title: Post
    description: d
    category: c
    date: "January 1st"
    author: x
    content: text
"#;
        let err = store_from_yaml(yaml).unwrap_err();
        assert!(matches!(err, IntegrityError::InvalidDate { .. }));
    }

    #[test]
    fn test_stale_reading_time_is_recomputed() {
        let yaml = r#"
categories:
  - { id: c, name: C, description: d, slug: c }
posts:
  - id: a
    slug: a-post
    title: Post
    description: d
    category: c
    date: "2024-01-01"
    author: x
    reading_time: 99
    content: just four words here
"#;
        let store = store_from_yaml(yaml).unwrap();
        assert_eq!(store.post_by_slug("a-post").unwrap().reading_time, 1);
    }

    #[test]
    fn test_tag_post_counts_recomputed() {
        let yaml = r#"
categories:
  - { id: c, name: C, description: d, slug: c }
tags:
  - { id: javascript, name: JavaScript, slug: javascript, post_count: 40 }
  - { id: vite, name: Vite, slug: vite }
posts:
  - id: a
    slug: a-post
    title: Post A
    description: d
    category: c
    tags: [javascript]
    date: "2024-01-01"
    author: x
    content: text
  - id: b
    slug: b-post
    title: Post B
    description: d
    category: c
    tags: [JavaScript, extra-label]
    date: "2024-01-02"
    author: x
    content: text
"#;
        let store = store_from_yaml(yaml).unwrap();
        let tags = store.all_tags();
        assert_eq!(tags[0].post_count, 2);
        assert_eq!(tags[1].post_count, 0);
    }

    #[test]
    fn test_embedded_catalog_is_consistent() {
        let store = ContentStore::from_catalog(Catalog::embedded().unwrap()).unwrap();
        assert_eq!(store.all_categories().len(), 4);
        assert_eq!(store.all_tags().len(), 8);
        assert!(store.all_posts().len() >= 8);
        assert!(store
            .post_by_slug("understanding-javascript-call-bind-apply")
            .is_some());
        for post in store.all_posts() {
            assert!(post.reading_time >= 1);
        }
    }
}
