//! Site configuration (geeklog.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name the configuration is read from, relative to the site root.
const CONFIG_FILE: &str = "geeklog.yml";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub assets_dir: String,
    pub public_dir: String,

    // Content
    /// Optional on-disk catalog that replaces the embedded one.
    pub content_file: Option<String>,

    // Display
    pub date_format: String,
    pub per_page: usize,

    // Preview server
    pub port: u16,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Geeklog".to_string(),
            subtitle: "技术博客与学习笔记".to_string(),
            description: "前端技术分享".to_string(),
            author: "Enjun Zhou".to_string(),
            language: "zh-CN".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            assets_dir: "assets".to_string(),
            public_dir: "public".to_string(),

            content_file: None,

            date_format: "%Y年%-m月%-d日".to_string(),
            per_page: 10,

            port: 4000,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load `geeklog.yml` from a site root, falling back to defaults when
    /// the file does not exist. A file that exists but cannot be parsed is
    /// an error, not a silent fallback.
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let path = base_dir.as_ref().join(CONFIG_FILE);

        if !path.exists() {
            tracing::debug!("No {} found, using default configuration", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid site configuration in {}", path.display()))?;
        Ok(config)
    }
}
