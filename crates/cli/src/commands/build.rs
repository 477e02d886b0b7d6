use anyhow::{Context, Result};
use folio_core::Site;
use folio_generator::{ContentSource, GeneratedSite, generate_site};
use std::fs;
use std::path::{Path, PathBuf};

use super::load_site;

/// Write generated artifacts for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building site artifacts...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let (site, source) = load_site(&path)?;
    println!("✓ Loaded: {}", site.site.title);

    let written = build_site(&source, &site, &output).await?;
    for file in &written {
        println!("   ✓ Wrote {}", file.display());
    }

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();

    Ok(())
}

/// Generate the site's artifacts and write them under `output`.
///
/// Nothing is written unless every artifact was generated.
pub async fn build_site<S: ContentSource + ?Sized>(
    source: &S,
    site: &Site,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let GeneratedSite { files } = generate_site(source, site)
        .await
        .context("Failed to generate site artifacts")?;

    fs::create_dir_all(output).context("Failed to create output directory")?;

    let mut written = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        let target = output.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}
