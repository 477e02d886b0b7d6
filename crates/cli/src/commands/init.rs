use anyhow::{Context, Result};
use chrono::Local;
use folio_core::{Collection, ContentConfig};
use std::fs;
use std::path::{Path, PathBuf};

use super::SITE_TOML;

/// Escape a string for safe inclusion in a TOML basic string
///
/// site.toml is written from a commented template rather than through
/// toml serialization, so values are escaped by hand.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a site directory with site.toml and sample content.
///
/// # Errors
///
/// Returns an error if:
/// - The directory doesn't exist
/// - site.toml already exists in the directory
/// - File operations fail (permissions, disk space, etc.)
pub async fn run(path: PathBuf, title: Option<String>, description: Option<String>) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    let title = title.unwrap_or_else(|| "My Portfolio".to_string());
    let description = description.unwrap_or_else(|| "Projects and writing".to_string());

    generate_site_toml(&path, &title, &description)?;
    println!("✓ Wrote site.toml");

    let content = ContentConfig::default();
    for collection in Collection::ALL {
        let created = create_collection(&path, &content, collection)?;
        println!("✓ Created {} collection", collection);
        if let Some(sample) = created {
            println!("  └── {}", sample.display());
        }
    }

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Edit this to set title and base_url");
    println!("  └── {}/", content.root.display());
    println!("      ├── blog/");
    println!("      └── portfolio/");

    println!("\nNext steps:");
    println!("  1. Edit site.toml");
    println!("  2. Write posts under {}/blog", content.root.display());
    println!("  3. Check content: folio validate {}", path.display());
    println!("  4. Preview: folio preview {}", path.display());

    Ok(())
}

fn generate_site_toml(base: &Path, title: &str, description: &str) -> Result<()> {
    let toml = format!(
        r#"# Site configuration

[site]
title = "{}"
description = "{}"
# Required for the RSS feed
# base_url = "https://example.com"

[content]
root = "src/content"
# blog_dir = "blog"
# portfolio_dir = "portfolio"

[redirects]
# Request path the redirect manifest is served under
path = "_redirects"

[rss]
enabled = true
path = "rss.xml"
# limit = 20
"#,
        toml_escape_string(title),
        toml_escape_string(description),
    );

    folio_core::config::parse_site_toml_str(&toml)
        .context("Generated site.toml failed validation")?;

    fs::write(base.join(SITE_TOML), toml).context("Failed to write site.toml")?;
    Ok(())
}

/// Create a collection directory, seeding it with a sample entry when empty.
///
/// Returns the sample's path relative to `base` when one was written.
fn create_collection(
    base: &Path,
    content: &ContentConfig,
    collection: Collection,
) -> Result<Option<PathBuf>> {
    let relative = content.collection_dir(collection);
    let dir = base.join(&relative);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let has_entries = fs::read_dir(&dir)?.next().is_some();
    if has_entries {
        return Ok(None);
    }

    let (file_name, template) = sample_entry(collection);
    fs::write(dir.join(file_name), template)
        .with_context(|| format!("Failed to write sample {} entry", collection))?;
    Ok(Some(relative.join(file_name)))
}

fn sample_entry(collection: Collection) -> (&'static str, String) {
    let today = Local::now().format("%Y-%m-%d");
    match collection {
        Collection::Blog => (
            "hello-world.md",
            format!(
                r#"---
title: Hello World
date: {}
tags: [meta]
description: The first post on this site
---

Welcome. This post lives at /blog/hello-world/ and the old
/hello-world/ address redirects to it.
"#,
                today
            ),
        ),
        Collection::Portfolio => (
            "first-project.md",
            format!(
                r#"---
title: First Project
date: {}
tags: [rust]
description: A short summary of the project
---

Describe what you built, the stack, and what you learned.
"#,
                today
            ),
        ),
    }
}
