//! Generator module - renders the site into static files

use anyhow::{anyhow, Result};
use std::fs;

use tera::Context;
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers;
use crate::query;
use crate::routes::{self, Route};
use crate::templates::{
    CategoryView, NavPostView, PostView, SiteUrls, TagView, TemplateRenderer, STYLESHEET,
};
use crate::Site;

/// Static site generator over a loaded `Site`
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self> {
        Ok(Self {
            site,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.write_stylesheet()?;
        self.copy_assets()?;

        let posts = self.build_post_views();
        let categories = self.build_category_views();
        let tags = self.build_tag_views();

        let site_routes = routes::site_routes(self.site.store());
        for route in &site_routes {
            let html = self.render_route(route, &posts, &categories, &tags)?;

            let output_path = self.site.public_dir.join(route.output_file());
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated {} -> {}", route.url_path(), output_path.display());
        }

        self.write_search_index(&posts)?;
        self.write_atom_feed(&posts)?;

        tracing::info!(
            "Generated {} pages into {}",
            site_routes.len(),
            self.site.public_dir.display()
        );
        Ok(())
    }

    /// Render the page behind a single route
    fn render_route(
        &self,
        route: &Route,
        posts: &[PostView],
        categories: &[CategoryView],
        tags: &[TagView],
    ) -> Result<String> {
        let mut context = self.base_context();

        match route {
            Route::Home => {
                let recent: Vec<&PostView> =
                    posts.iter().take(self.site.config.per_page).collect();
                context.insert("categories", categories);
                context.insert("tags", tags);
                context.insert("recent_posts", &recent);
                self.renderer.render("index.html", &context)
            }
            Route::PostIndex => {
                let filter_tags = query::distinct_tags(self.site.store().all_posts());
                context.insert("posts", posts);
                context.insert("categories", categories);
                context.insert("filter_tags", &filter_tags);
                self.renderer.render("posts.html", &context)
            }
            Route::Post(slug) => {
                let view = posts
                    .iter()
                    .find(|p| p.slug == *slug)
                    .ok_or_else(|| anyhow!("No rendered post for slug: {}", slug))?;
                let (prev, next) = self.neighbor_views(slug);
                context.insert("post", view);
                context.insert("prev", &prev);
                context.insert("next", &next);
                self.renderer.render("post.html", &context)
            }
            Route::Category(slug) => {
                let category = routes::resolve_category(self.site.store(), slug)
                    .ok_or_else(|| anyhow!("No category for slug: {}", slug))?;
                let view = categories
                    .iter()
                    .find(|c| c.id == category.id)
                    .ok_or_else(|| anyhow!("No category view for id: {}", category.id))?;
                let category_posts: Vec<&PostView> =
                    posts.iter().filter(|p| p.category == view.id).collect();
                context.insert("category", view);
                context.insert("posts", &category_posts);
                self.renderer.render("category.html", &context)
            }
            Route::About => self.renderer.render("about.html", &context),
            Route::NotFound => self.renderer.render("404.html", &context),
        }
    }

    /// Prev/next links for a post page, following store order
    fn neighbor_views(&self, slug: &str) -> (Option<NavPostView>, Option<NavPostView>) {
        let store = self.site.store();
        let config = &self.site.config;

        let nav = |post: &Post| NavPostView {
            title: post.title.clone(),
            url: helpers::post_url(config, &post.slug),
        };

        match routes::resolve_post(store, slug) {
            Some(post) => (
                post.prev(store.all_posts()).map(nav),
                post.next(store.all_posts()).map(nav),
            ),
            None => (None, None),
        }
    }

    /// Prepare every post for rendering, in store order
    fn build_post_views(&self) -> Vec<PostView> {
        let store = self.site.store();
        let config = &self.site.config;

        store
            .all_posts()
            .iter()
            .map(|post| {
                let rendered = self.site.render_post(post);
                let (category_name, category_url) = match store.category_by_id(&post.category) {
                    Some(category) => (
                        category.name.clone(),
                        helpers::category_url(config, &category.slug),
                    ),
                    // Cannot happen after store validation
                    None => (post.category.clone(), helpers::url_for(config, "posts/")),
                };

                PostView {
                    slug: post.slug.clone(),
                    title: post.title.clone(),
                    description: post.description.clone(),
                    url: helpers::post_url(config, &post.slug),
                    date: post.date.clone(),
                    author: post.author.clone(),
                    category: post.category.clone(),
                    category_name,
                    category_url,
                    tags: post.tags.clone(),
                    reading_time: post.reading_time,
                    content: rendered.html,
                    cover_image: post.cover_image.as_deref().map(helpers::encode_url),
                }
            })
            .collect()
    }

    fn build_category_views(&self) -> Vec<CategoryView> {
        let store = self.site.store();
        let config = &self.site.config;

        store
            .all_categories()
            .iter()
            .map(|category| CategoryView {
                id: category.id.clone(),
                name: category.name.clone(),
                description: category.description.clone(),
                slug: category.slug.clone(),
                url: helpers::category_url(config, &category.slug),
                cover_image: category.cover_image.as_deref().map(helpers::encode_url),
                post_count: store.posts_by_category(&category.id).len(),
            })
            .collect()
    }

    fn build_tag_views(&self) -> Vec<TagView> {
        self.site
            .store()
            .all_tags()
            .iter()
            .map(|tag| TagView {
                id: tag.id.clone(),
                name: tag.name.clone(),
                slug: tag.slug.clone(),
                post_count: tag.post_count,
            })
            .collect()
    }

    /// Context variables every template expects
    fn base_context(&self) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert("config", config);
        context.insert(
            "urls",
            &SiteUrls {
                home: helpers::url_for(config, ""),
                posts: helpers::url_for(config, "posts/"),
                about: helpers::url_for(config, "about/"),
                search_index: helpers::url_for(config, "posts.json"),
                feed: helpers::url_for(config, "atom.xml"),
                css: helpers::url_for(config, "css/style.css"),
            },
        );
        context
    }

    /// Write the client-side search index (JSON)
    fn write_search_index(&self, posts: &[PostView]) -> Result<()> {
        let entries: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "title": p.title,
                    "description": p.description,
                    "category": p.category,
                    "tags": p.tags,
                    "url": p.url,
                    "date": p.date,
                    "reading_time": p.reading_time,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(self.site.public_dir.join("posts.json"), json)?;
        tracing::debug!("Generated posts.json");

        Ok(())
    }

    /// Write the Atom feed, newest posts first
    fn write_atom_feed(&self, posts: &[PostView]) -> Result<()> {
        let config = &self.site.config;

        // Feed order is chronological even though the store keeps
        // declaration order; YYYY-MM-DD strings compare correctly
        let mut recent: Vec<&PostView> = posts.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(20);

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            helpers::full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!(
            "  <link href=\"{}\"/>\n",
            helpers::full_url_for(config, "")
        ));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        feed.push_str(&format!(
            "  <id>{}</id>\n",
            helpers::full_url_for(config, "")
        ));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in recent {
            let link = helpers::full_url_for(config, &format!("post/{}/", post.slug));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}T00:00:00Z</published>\n",
                post.date
            ));
            feed.push_str(&format!("    <updated>{}T00:00:00Z</updated>\n", post.date));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.description)
            ));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                post.content
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        fs::write(self.site.public_dir.join("atom.xml"), feed)?;
        tracing::debug!("Generated atom.xml");

        Ok(())
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        let css_dir = self.site.public_dir.join("css");
        fs::create_dir_all(&css_dir)?;
        fs::write(css_dir.join("style.css"), STYLESHEET)?;
        Ok(())
    }

    /// Copy static assets into the public directory
    fn copy_assets(&self) -> Result<()> {
        let assets_dir = self.site.base_dir.join(&self.site.config.assets_dir);
        if !assets_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(&assets_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(&assets_dir)?;
                let dest = self.site.public_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        tracing::debug!("Copied assets from {}", assets_dir.display());
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_embedded_site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::load(dir.path()).unwrap();
        Generator::new(&site).unwrap().generate().unwrap();
        (dir, site)
    }

    #[test]
    fn test_generate_writes_every_route_file() {
        let (_dir, site) = generate_embedded_site();

        for route in routes::site_routes(site.store()) {
            let path = site.public_dir.join(route.output_file());
            assert!(path.is_file(), "missing output for {:?}", route);
        }
        assert!(site.public_dir.join("posts.json").is_file());
        assert!(site.public_dir.join("css/style.css").is_file());
    }

    #[test]
    fn test_home_page_lists_categories_and_recent_posts() {
        let (_dir, site) = generate_embedded_site();
        let html = std::fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(html.contains("JavaScript深入系列"));
        assert!(html.contains("最新文章"));
    }

    #[test]
    fn test_post_page_has_content_and_neighbors() {
        let (_dir, site) = generate_embedded_site();
        let first = &site.store().all_posts()[0];
        let path = site
            .public_dir
            .join(format!("post/{}/index.html", first.slug));
        let html = std::fs::read_to_string(path).unwrap();

        assert!(html.contains(&first.title));
        // The first post has a next neighbor but no previous one
        assert!(html.contains("下一篇"));
        assert!(!html.contains("上一篇"));
    }

    #[test]
    fn test_search_index_covers_every_post() {
        let (_dir, site) = generate_embedded_site();
        let raw = std::fs::read_to_string(site.public_dir.join("posts.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();

        assert_eq!(entries.len(), site.store().all_posts().len());
        assert_eq!(
            entries[0]["slug"],
            site.store().all_posts()[0].slug.as_str()
        );
        assert!(entries[0]["tags"].is_array());
    }

    #[test]
    fn test_atom_feed_covers_every_post() {
        let (_dir, site) = generate_embedded_site();
        let feed = std::fs::read_to_string(site.public_dir.join("atom.xml")).unwrap();

        assert!(feed.starts_with("<?xml"));
        assert_eq!(
            feed.matches("<entry>").count(),
            site.store().all_posts().len()
        );
        assert!(feed.contains(&site.store().all_posts()[0].title));
        assert!(feed.contains("http://example.com/post/"));
    }

    #[test]
    fn test_empty_category_page_renders_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("geeklog.yml"),
            "title: Test\ncontent_file: catalog.yml\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("catalog.yml"),
            r#"
categories:
  - id: rust
    name: Rust
    description: Systems programming
    slug: rust
  - id: go
    name: Go
    description: Cloud tooling
    slug: go
tags: []
posts:
  - id: go-modules
    slug: go-modules-guide
    title: Go Modules Guide
    description: Dependency management in Go
    category: go
    tags: [go]
    date: "2024-03-01"
    author: tester
    content: "Modules pin versions."
"#,
        )
        .unwrap();

        let site = Site::load(dir.path()).unwrap();
        Generator::new(&site).unwrap().generate().unwrap();

        let rust_html =
            std::fs::read_to_string(site.public_dir.join("category/rust/index.html")).unwrap();
        assert!(rust_html.contains("该分类下暂无文章"));

        let go_html =
            std::fs::read_to_string(site.public_dir.join("category/go/index.html")).unwrap();
        assert!(go_html.contains("Go Modules Guide"));
        assert!(!go_html.contains("该分类下暂无文章"));
    }
}
