use anyhow::{Context, Result};
use folio_generator::load_collections;
use folio_validator::validate_site;
use std::path::PathBuf;

use super::load_site;

pub async fn run(path: PathBuf, json: bool) -> Result<()> {
    let (site, source) = load_site(&path)?;
    let collections = load_collections(&source)
        .await
        .context("Failed to load content collections")?;
    let report = validate_site(&collections);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validating site at: {}", path.display());
        println!("✓ site.toml valid");
        println!("  Site: {}", site.site.title);
        if site.rss.enabled && site.site.base_url.is_none() {
            println!("⚠ site.base_url not set: the RSS feed will be skipped");
        }
        for line in &report.info {
            println!("  {}", line);
        }
        for warning in &report.warnings {
            println!("⚠ {}", warning);
        }
        for error in &report.errors {
            println!("✗ {}", error);
        }
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    if !json {
        println!("\n✅ Content valid");
    }
    Ok(())
}
