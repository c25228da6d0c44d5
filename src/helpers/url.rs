//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters that cannot appear raw in a URL path.
/// Non-ASCII is always percent-encoded, so label-derived paths stay valid.
const PATH_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'#')
    .add(b'?');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/posts/") // -> "/blog/posts/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of a post page
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("post/{}/", slug))
}

/// URL of a category page
pub fn category_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("category/{}/", slug))
}

/// Percent-encode a path for use in an href attribute
///
/// # Examples
/// ```ignore
/// encode_url("/images/我的封面.png") // -> "/images/%E6%88%91..."
/// ```
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, PATH_UNSAFE).to_string()
}
