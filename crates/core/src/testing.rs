//! Fixtures for tests across the workspace.

use std::path::PathBuf;

use crate::types::{Collection, ContentEntry, EntryData};

/// A published entry titled after its slug, with a one-line body
pub fn entry(slug: &str, collection: Collection) -> ContentEntry {
    ContentEntry {
        slug: slug.to_string(),
        collection,
        data: EntryData {
            title: slug.to_string(),
            ..Default::default()
        },
        excerpt: format!("Body of {}.", slug),
        source: PathBuf::from(format!("{}.md", slug)),
    }
}
