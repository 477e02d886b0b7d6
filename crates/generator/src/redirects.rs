//! Cloudflare Pages `_redirects` manifest.
//!
//! Entries used to live at `/{slug}/`; they now live under their
//! collection's prefix. The manifest sends the old paths to the new ones.

use folio_core::{ContentEntry, RedirectRule, RedirectsConfig, Result};
use tracing::info;

use crate::content::{ContentSource, load_collections};

/// Build the manifest: blog rules first, then portfolio rules, each in the
/// source's enumeration order.
///
/// Slugs are neither sorted nor de-duplicated; a slug present in both
/// collections yields two rules for the same path. A collection that cannot
/// be listed fails the whole build.
pub async fn build_redirect_manifest<S: ContentSource + ?Sized>(source: &S) -> Result<String> {
    let collections = load_collections(source).await?;

    let rules = redirect_rules(collections.iter().flat_map(|(_, entries)| entries));

    info!(rules = rules.len(), "built redirect manifest");
    Ok(render_manifest(&rules))
}

/// Redirect rules for a list of entries
pub fn redirect_rules<'a>(
    entries: impl IntoIterator<Item = &'a ContentEntry>,
) -> Vec<RedirectRule> {
    entries.into_iter().map(RedirectRule::for_entry).collect()
}

/// One `<from> <to> <status>` line per rule, each newline-terminated
pub fn render_manifest(rules: &[RedirectRule]) -> String {
    rules.iter().map(|rule| format!("{}\n", rule)).collect()
}

/// Serve the manifest for `requested_path`.
///
/// Only the configured manifest path produces a body; anything else is
/// `Ok(None)` and the content source is not consulted.
pub async fn respond<S: ContentSource + ?Sized>(
    source: &S,
    redirects: &RedirectsConfig,
    requested_path: &str,
) -> Result<Option<String>> {
    if !redirects.matches(requested_path) {
        return Ok(None);
    }
    build_redirect_manifest(source).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticContentSource;
    use folio_core::testing::entry;
    use folio_core::{Collection, Error};

    fn source(posts: &[&str], projects: &[&str]) -> StaticContentSource {
        StaticContentSource::new()
            .with_collection(
                Collection::Blog,
                posts.iter().map(|s| entry(s, Collection::Blog)).collect(),
            )
            .with_collection(
                Collection::Portfolio,
                projects
                    .iter()
                    .map(|s| entry(s, Collection::Portfolio))
                    .collect(),
            )
    }

    #[tokio::test]
    async fn test_single_post_manifest() {
        let manifest = build_redirect_manifest(&source(&["hello"], &[]))
            .await
            .unwrap();
        assert_eq!(manifest, "/hello/ /blog/hello/ 301\n");
    }

    #[tokio::test]
    async fn test_posts_precede_projects_in_source_order() {
        let manifest = build_redirect_manifest(&source(&["a", "b"], &["c"]))
            .await
            .unwrap();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(
            lines,
            vec![
                "/a/ /blog/a/ 301",
                "/b/ /blog/b/ 301",
                "/c/ /portfolio/c/ 301",
            ]
        );
        assert!(manifest.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_no_sorting_applied() {
        let manifest = build_redirect_manifest(&source(&["zeta", "alpha"], &[]))
            .await
            .unwrap();
        assert_eq!(
            manifest,
            "/zeta/ /blog/zeta/ 301\n/alpha/ /blog/alpha/ 301\n"
        );
    }

    #[tokio::test]
    async fn test_shared_slug_emits_both_rules() {
        let manifest = build_redirect_manifest(&source(&["same"], &["same"]))
            .await
            .unwrap();
        assert_eq!(
            manifest,
            "/same/ /blog/same/ 301\n/same/ /portfolio/same/ 301\n"
        );
    }

    #[tokio::test]
    async fn test_empty_collections_give_empty_manifest() {
        let manifest = build_redirect_manifest(&source(&[], &[])).await.unwrap();
        assert_eq!(manifest, "");
    }

    #[tokio::test]
    async fn test_missing_collection_fails_without_partial_output() {
        let only_blog = StaticContentSource::new()
            .with_collection(Collection::Blog, vec![entry("a", Collection::Blog)]);

        let err = build_redirect_manifest(&only_blog).await.unwrap_err();
        assert!(matches!(err, Error::CollectionUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_respond_only_for_manifest_path() {
        let src = source(&["hello"], &[]);
        let redirects = RedirectsConfig::default();

        let body = respond(&src, &redirects, "_redirects").await.unwrap();
        assert_eq!(body.as_deref(), Some("/hello/ /blog/hello/ 301\n"));

        let body = respond(&src, &redirects, "/_redirects").await.unwrap();
        assert!(body.is_some());

        for other in [
            "/",
            "/blog/",
            "_headers",
            "redirects",
            "/_redirects/extra",
            "//_redirects",
        ] {
            let body = respond(&src, &redirects, other).await.unwrap();
            assert_eq!(body, None, "{}", other);
        }
    }

    #[tokio::test]
    async fn test_respond_other_path_does_not_touch_source() {
        // No collections registered: building would fail
        let empty = StaticContentSource::new();
        let redirects = RedirectsConfig::default();

        assert_eq!(respond(&empty, &redirects, "/about").await.unwrap(), None);
        assert!(respond(&empty, &redirects, "/_redirects").await.is_err());
    }

    #[test]
    fn test_render_manifest_lines() {
        let entries = [entry("x", Collection::Portfolio), entry("y", Collection::Blog)];
        let rules = redirect_rules(&entries);
        assert_eq!(
            render_manifest(&rules),
            "/x/ /portfolio/x/ 301\n/y/ /blog/y/ 301\n"
        );
    }
}
