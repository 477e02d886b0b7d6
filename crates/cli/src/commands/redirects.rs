use anyhow::{Context, Result};
use folio_generator::build_redirect_manifest;
use std::io::{self, Write};
use std::path::PathBuf;

use super::load_site;

/// Print the redirect manifest to stdout
pub async fn run(path: PathBuf) -> Result<()> {
    let (_, source) = load_site(&path)?;
    let manifest = build_redirect_manifest(&source)
        .await
        .context("Failed to build redirect manifest")?;

    io::stdout()
        .write_all(manifest.as_bytes())
        .context("Failed to write manifest")?;
    Ok(())
}
