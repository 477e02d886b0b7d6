pub mod build;
pub mod init;
pub mod preview;
pub mod redirects;
pub mod validate;

use anyhow::{Context, Result};
use folio_core::{Site, parse_site_toml};
use folio_generator::FsContentSource;
use std::path::Path;

pub const SITE_TOML: &str = "site.toml";

/// Load site.toml and the content source for a site directory
pub fn load_site(path: &Path) -> Result<(Site, FsContentSource)> {
    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'folio init {}' first",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if !site_toml_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'folio init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }

    let site = parse_site_toml(&site_toml_path).context("Failed to parse site.toml")?;
    let source = FsContentSource::for_site(path, &site);
    Ok((site, source))
}
