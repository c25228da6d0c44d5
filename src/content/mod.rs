//! Content module - records, front-matter, Markdown rendering and the store

mod frontmatter;
mod markdown;
mod model;
mod store;

pub use frontmatter::FrontMatter;
pub use markdown::{reading_time, word_count, MarkdownRenderer, Rendered};
pub use model::{Catalog, Category, Post, PostRecord, Tag};
pub use store::{ContentStore, IntegrityError};
