//! Clean the public directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

/// Delete the generated output
///
/// Takes only the configuration, so cleaning works even when the content
/// catalog is broken.
pub fn run(base_dir: &Path, config: &SiteConfig) -> Result<()> {
    let public_dir = base_dir.join(&config.public_dir);

    if public_dir.exists() {
        fs::remove_dir_all(&public_dir)?;
        tracing::info!("Deleted: {}", public_dir.display());
    }

    Ok(())
}
