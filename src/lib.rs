//! geeklog: a personal blog engine with a validated content store
//!
//! This crate loads a YAML content catalog into an in-memory store that is
//! validated up front, renders Markdown post bodies to HTML, and generates
//! the whole site as static files with a small preview server on top.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod query;
pub mod routes;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use content::{Catalog, ContentStore, MarkdownRenderer, Post, Rendered};

/// The loaded site: configuration plus the validated content store
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    store: ContentStore,
    renderer: MarkdownRenderer,
}

impl Site {
    /// Load a site from a directory
    ///
    /// Reads `geeklog.yml` (defaults when absent), then the content catalog
    /// (the embedded one unless `content_file` points elsewhere). A catalog
    /// that fails validation aborts the load; no content is served from it.
    pub fn load<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(&base_dir)?;

        let catalog = match &config.content_file {
            Some(file) => Catalog::load(&base_dir.join(file))?,
            None => Catalog::embedded()?,
        };
        let store = ContentStore::from_catalog(catalog)
            .context("Refusing to start with an invalid content catalog")?;

        tracing::info!(
            "Loaded {} posts, {} categories, {} tags",
            store.all_posts().len(),
            store.all_categories().len(),
            store.all_tags().len()
        );

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            store,
            renderer: MarkdownRenderer::new(),
        })
    }

    /// The validated content store
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Render a post body to HTML
    pub fn render_post(&self, post: &Post) -> Rendered {
        self.renderer.render(&post.content)
    }
}
