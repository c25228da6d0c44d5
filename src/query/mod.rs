//! Post filtering - term search, category and tag narrowing

use indexmap::IndexSet;

use crate::content::Post;

/// Sentinel accepted by category and tag criteria meaning "no restriction"
pub const ALL: &str = "all";

/// Criteria for narrowing a post list.
///
/// All three predicates must hold for a post to pass. A `None` selection
/// and the explicit `"all"` sentinel both mean no restriction, mirroring
/// the filter controls' default state.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title, description and
    /// tag labels; the empty string matches every post
    pub term: String,

    /// Category id to require, or `"all"`
    pub category: Option<String>,

    /// Tag label to require (exact membership), or `"all"`
    pub tag: Option<String>,
}

impl FilterCriteria {
    /// Whether a single post satisfies all three predicates
    pub fn matches(&self, post: &Post) -> bool {
        self.term_allows(post) && self.category_allows(post) && self.tag_allows(post)
    }

    fn term_allows(&self, post: &Post) -> bool {
        if self.term.is_empty() {
            return true;
        }
        let term = self.term.to_lowercase();
        post.title.to_lowercase().contains(&term)
            || post.description.to_lowercase().contains(&term)
            || post
                .tags
                .iter()
                .any(|label| label.to_lowercase().contains(&term))
    }

    fn category_allows(&self, post: &Post) -> bool {
        match self.category.as_deref() {
            None | Some(ALL) => true,
            Some(id) => post.category == id,
        }
    }

    fn tag_allows(&self, post: &Post) -> bool {
        match self.tag.as_deref() {
            None | Some(ALL) => true,
            Some(label) => post.tags.iter().any(|l| l == label),
        }
    }
}

/// Filter posts by the given criteria, preserving input order.
///
/// Pure over its inputs; never re-sorts. Criteria naming an unknown
/// category or tag yield an empty result rather than an error.
pub fn filter_posts<'a>(posts: &'a [Post], criteria: &FilterCriteria) -> Vec<&'a Post> {
    posts.iter().filter(|post| criteria.matches(post)).collect()
}

/// The de-duplicated union of every post's tag labels, first appearance
/// first. These are the options a tag filter control offers.
pub fn distinct_tags(posts: &[Post]) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for post in posts {
        for label in &post.tags {
            seen.insert(label.clone());
        }
    }
    seen.into_iter().collect()
}
