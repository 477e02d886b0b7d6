//! Content collections.
//!
//! A [`ContentSource`] enumerates the entries of a collection. The filesystem
//! source reads markdown files from the site's content directory; the static
//! source serves entries held in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use folio_core::{Collection, ContentConfig, ContentEntry, Error, Result, Site, slug_problem};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::frontmatter::{EXCERPT_LENGTH, excerpt, parse_entry};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every entry of a collection, in the source's enumeration order.
    ///
    /// Fails when the collection is missing or any entry is malformed.
    async fn list_entries(&self, collection: Collection) -> Result<Vec<ContentEntry>>;
}

/// Enumerate every collection, in manifest order
pub async fn load_collections<S: ContentSource + ?Sized>(
    source: &S,
) -> Result<Vec<(Collection, Vec<ContentEntry>)>> {
    let lists =
        futures::future::try_join_all(Collection::ALL.map(|c| source.list_entries(c))).await?;
    Ok(Collection::ALL.into_iter().zip(lists).collect())
}

/// Markdown collections under a site directory
#[derive(Debug, Clone)]
pub struct FsContentSource {
    site_dir: PathBuf,
    content: ContentConfig,
}

impl FsContentSource {
    pub fn new(site_dir: impl Into<PathBuf>, content: ContentConfig) -> Self {
        Self {
            site_dir: site_dir.into(),
            content,
        }
    }

    pub fn for_site(site_dir: impl Into<PathBuf>, site: &Site) -> Self {
        Self::new(site_dir, site.content.clone())
    }

    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.site_dir.join(self.content.collection_dir(collection))
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn list_entries(&self, collection: Collection) -> Result<Vec<ContentEntry>> {
        let dir = self.collection_dir(collection);
        tokio::task::spawn_blocking(move || scan_collection(&dir, collection))
            .await
            .map_err(|e| Error::CollectionUnavailable {
                collection,
                reason: e.to_string(),
            })?
    }
}

/// Read every markdown entry under `dir`, sorted by file name.
///
/// Files and directories starting with `_` or `.` are not part of the
/// collection.
fn scan_collection(dir: &Path, collection: Collection) -> Result<Vec<ContentEntry>> {
    if !dir.is_dir() {
        return Err(Error::CollectionUnavailable {
            collection,
            reason: format!("directory not found: {}", dir.display()),
        });
    }

    info!(%collection, dir = %dir.display(), "scanning collection");

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e));

    let mut entries = Vec::new();
    for item in walker {
        let item = item.map_err(|e| Error::CollectionUnavailable {
            collection,
            reason: e.to_string(),
        })?;
        if !item.file_type().is_file() || !is_markdown(item.path()) {
            continue;
        }

        let relative = item
            .path()
            .strip_prefix(dir)
            .map_err(|e| Error::InvalidData(e.to_string()))?
            .to_path_buf();
        let raw = fs::read_to_string(item.path())?;
        let (data, body) = parse_entry(&raw, &relative)?;

        let slug = match data.slug.as_deref() {
            Some(explicit) => explicit.trim_matches('/').to_string(),
            None => slug_from_path(&relative),
        };
        if let Some(problem) = slug_problem(&slug) {
            return Err(Error::Frontmatter {
                path: relative,
                message: format!("slug '{}' {}", slug, problem),
            });
        }
        debug!(%collection, slug = %slug, "found entry");

        entries.push(ContentEntry {
            slug,
            collection,
            excerpt: excerpt(&body, EXCERPT_LENGTH),
            data,
            source: relative,
        });
    }

    info!(%collection, count = entries.len(), "collection loaded");
    Ok(entries)
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('_') || name.starts_with('.'))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| m.eq_ignore_ascii_case(ext))
        })
}

/// Slug for an entry file, relative to its collection directory.
///
/// `hello-world.md` → `hello-world`, `2023/My Post/index.md` → `2023/my-post`
pub fn slug_from_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    segments.join("/")
}

/// Lowercase, whitespace to `-`, keep only alphanumerics, `-` and `_`
fn slugify(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Entries held in memory, keyed by collection
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    collections: HashMap<Collection, Vec<ContentEntry>>,
}

impl StaticContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection. Entries keep the given order.
    pub fn with_collection(mut self, collection: Collection, entries: Vec<ContentEntry>) -> Self {
        self.collections.insert(collection, entries);
        self
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn list_entries(&self, collection: Collection) -> Result<Vec<ContentEntry>> {
        self.collections
            .get(&collection)
            .cloned()
            .ok_or_else(|| Error::CollectionUnavailable {
                collection,
                reason: "collection not registered".to_string(),
            })
    }
}
