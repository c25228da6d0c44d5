//! Built-in site templates using Tera template engine
//!
//! All templates are embedded directly in the binary, so a generated site
//! needs no theme directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers;

/// Stylesheet written alongside the generated pages.
pub const STYLESHEET: &str = include_str!("site/style.css");

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post bodies arrive as rendered HTML and URLs are prebuilt, so
        // values must pass through unescaped
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("posts.html", include_str!("site/posts.html")),
            ("post.html", include_str!("site/post.html")),
            ("category.html", include_str!("site/category.html")),
            ("about.html", include_str!("site/about.html")),
            ("404.html", include_str!("site/404.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("excerpt", excerpt_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a `YYYY-MM-DD` date string
///
/// Without a `format` argument the display form is used, e.g. "2024年1月14日".
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let formatted = match args.get("format") {
        Some(val) => {
            let pattern = tera::try_get_value!("date_format", "format", String, val);
            helpers::format_date(&s, &pattern)
        }
        None => helpers::display_date(&s),
    };
    Ok(tera::Value::String(formatted))
}

/// Tera filter: plain-text excerpt of an HTML or text fragment
fn excerpt_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("excerpt", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("excerpt", "length", usize, val),
        None => 160,
    };
    Ok(tera::Value::String(helpers::excerpt(&s, length)))
}

/// A post prepared for rendering: URLs resolved, body converted to HTML
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub category_name: String,
    pub category_url: String,
    pub tags: Vec<String>,
    pub reading_time: u32,
    pub content: String,
    pub cover_image: Option<String>,
}

/// A category prepared for rendering
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub url: String,
    pub cover_image: Option<String>,
    pub post_count: usize,
}

/// A tag with its recomputed post count
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub post_count: usize,
}

/// Neighbor link on a post page
#[derive(Debug, Clone, Serialize)]
pub struct NavPostView {
    pub title: String,
    pub url: String,
}

/// Site-wide URLs handed to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteUrls {
    pub home: String,
    pub posts: String,
    pub about: String,
    pub search_index: String,
    pub feed: String,
    pub css: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("config", &SiteConfig::default());
        context.insert(
            "urls",
            &SiteUrls {
                home: "/".to_string(),
                posts: "/posts/".to_string(),
                about: "/about/".to_string(),
                search_index: "/posts.json".to_string(),
                feed: "/atom.xml".to_string(),
                css: "/css/style.css".to_string(),
            },
        );
        context
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_render_not_found_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render("404.html", &base_context()).unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("返回首页"));
    }

    #[test]
    fn test_date_format_filter_default_is_display_form() {
        let value = tera::Value::String("2024-01-14".to_string());
        let out = date_format_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("2024年1月14日".to_string()));
    }
}
