// Build-time artifacts generated from the content collections

pub mod content;
pub mod feed;
pub mod frontmatter;
pub mod redirects;

use folio_core::{Collection, Result, Site};
use tracing::warn;

pub use content::{ContentSource, FsContentSource, StaticContentSource, load_collections};
pub use feed::{feed_entries, render_feed};
pub use redirects::{build_redirect_manifest, redirect_rules, render_manifest, respond};

pub struct GeneratedSite {
    pub files: Vec<(String, String)>, // (path relative to output, contents)
}

/// Generate every artifact this tool owns for the site.
///
/// Collections are listed once and shared by the manifest and the feed. The
/// feed needs `site.base_url`; without it the feed is skipped.
pub async fn generate_site<S: ContentSource + ?Sized>(
    source: &S,
    site: &Site,
) -> Result<GeneratedSite> {
    let collections = load_collections(source).await?;

    let rules = redirect_rules(collections.iter().flat_map(|(_, entries)| entries));
    let mut files = vec![(site.redirects.path.clone(), render_manifest(&rules))];

    if site.rss.enabled {
        match site.site.base_url.as_deref() {
            Some(base_url) => {
                let blog = collections
                    .iter()
                    .find(|(c, _)| *c == Collection::Blog)
                    .map(|(_, entries)| entries.as_slice())
                    .unwrap_or_default();
                let feed = render_feed(&site.site, base_url, blog, &site.rss)?;
                files.push((site.rss.path.clone(), feed));
            }
            None => warn!("site.base_url is not set, skipping RSS feed"),
        }
    }

    Ok(GeneratedSite { files })
}
