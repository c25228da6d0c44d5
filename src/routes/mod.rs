//! Route resolution for the site's URL surface
//!
//! The site serves `/`, `/posts`, `/post/{slug}`, `/category/{slug}` and
//! `/about`. Slug resolution is exact match only; `None` is the distinct
//! not-found signal. A category that resolves but owns no posts is a valid
//! page with an empty list, not a miss.

use std::path::PathBuf;

use crate::content::{Category, ContentStore, Post};

/// One addressable page of the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    PostIndex,
    Post(String),
    Category(String),
    About,
    NotFound,
}

impl Route {
    /// URL path for this route, rooted at `/`
    pub fn url_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::PostIndex => "/posts/".to_string(),
            Route::Post(slug) => format!("/post/{}/", slug),
            Route::Category(slug) => format!("/category/{}/", slug),
            Route::About => "/about/".to_string(),
            Route::NotFound => "/404.html".to_string(),
        }
    }

    /// File the generator writes for this route, relative to the output dir
    pub fn output_file(&self) -> PathBuf {
        match self {
            Route::Home => PathBuf::from("index.html"),
            Route::PostIndex => PathBuf::from("posts/index.html"),
            Route::Post(slug) => PathBuf::from(format!("post/{}/index.html", slug)),
            Route::Category(slug) => PathBuf::from(format!("category/{}/index.html", slug)),
            Route::About => PathBuf::from("about/index.html"),
            Route::NotFound => PathBuf::from("404.html"),
        }
    }
}

/// Resolve a post page by exact slug match
pub fn resolve_post<'a>(store: &'a ContentStore, slug: &str) -> Option<&'a Post> {
    store.post_by_slug(slug)
}

/// Resolve a category page by exact slug match
pub fn resolve_category<'a>(store: &'a ContentStore, slug: &str) -> Option<&'a Category> {
    store.category_by_slug(slug)
}

/// Every post slug exactly once, in store order
pub fn post_slugs(store: &ContentStore) -> Vec<String> {
    store.all_posts().iter().map(|p| p.slug.clone()).collect()
}

/// Every category slug exactly once, in store order
pub fn category_slugs(store: &ContentStore) -> Vec<String> {
    store
        .all_categories()
        .iter()
        .map(|c| c.slug.clone())
        .collect()
}

/// The complete set of pages a generation pass emits
pub fn site_routes(store: &ContentStore) -> Vec<Route> {
    let mut routes = vec![Route::Home, Route::PostIndex, Route::About];
    routes.extend(post_slugs(store).into_iter().map(Route::Post));
    routes.extend(category_slugs(store).into_iter().map(Route::Category));
    routes.push(Route::NotFound);
    routes
}
