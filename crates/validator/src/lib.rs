// Pre-build checks over the content collections

use std::collections::HashMap;

use folio_core::{Collection, ContentEntry, slug_problem};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every collection's entries.
///
/// A slug shared between collections is only a warning: both redirect rules
/// are still emitted and the first one wins at the edge.
pub fn validate_site(collections: &[(Collection, Vec<ContentEntry>)]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut owners: HashMap<&str, Vec<Collection>> = HashMap::new();

    for (collection, entries) in collections {
        report
            .info
            .push(format!("{}: {} entries", collection, entries.len()));

        let mut seen: HashMap<&str, &ContentEntry> = HashMap::new();
        for entry in entries {
            let location = format!("{}/{}", collection, entry.source.display());

            if let Some(problem) = slug_problem(&entry.slug) {
                report
                    .errors
                    .push(format!("{}: slug '{}' {}", location, entry.slug, problem));
                continue;
            }

            if let Some(first) = seen.insert(&entry.slug, entry) {
                report.errors.push(format!(
                    "{}: slug '{}' already used by {}",
                    location,
                    entry.slug,
                    first.source.display()
                ));
                continue;
            }
            owners.entry(&entry.slug).or_default().push(*collection);

            if entry.data.draft {
                report.warnings.push(format!(
                    "{}: draft entry is still published in the redirect manifest",
                    location
                ));
            }

            let has_description = entry
                .data
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty());
            if !has_description && entry.excerpt.is_empty() {
                report
                    .warnings
                    .push(format!("{}: no description and empty body", location));
            }
        }
    }

    let mut shared: Vec<(&str, Vec<Collection>)> = owners
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .collect();
    shared.sort();
    for (slug, owners) in shared {
        let names: Vec<String> = owners.iter().map(|c| c.to_string()).collect();
        report.warnings.push(format!(
            "slug '{}' exists in {}: /{}/ gets conflicting redirects",
            slug,
            names.join(" and "),
            slug
        ));
    }

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}
