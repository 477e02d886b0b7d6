use folio_core::{ActiveFilter, FilterIndex};
use tracing::debug;

use crate::dom::{Dom, Selector, Visibility};

/// What a pass of [`apply_filter`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub shown: usize,
    pub hidden: usize,
    /// Indexed entries whose node is gone
    pub missing: usize,
}

/// Show the entries admitted by `filter` and hide the rest.
///
/// An entry whose node is no longer in the document is skipped. Applying the
/// same filter twice leaves the document as applying it once.
pub fn apply_filter<D: Dom + ?Sized>(
    dom: &D,
    index: &FilterIndex,
    filter: &ActiveFilter,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for entry in index.iter() {
        let selector = Selector::entry(&entry.id);
        let Some(node) = dom.find_nodes_matching(&selector).into_iter().next() else {
            debug!(id = %entry.id, "entry node gone, skipping");
            outcome.missing += 1;
            continue;
        };

        if filter.admits(&entry.tags) {
            debug!(%selector, "showing");
            dom.set_node_visibility(&node, Visibility::Visible);
            outcome.shown += 1;
        } else {
            debug!(%selector, "hiding");
            dom.set_node_visibility(&node, Visibility::Hidden);
            outcome.hidden += 1;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryDom, NodeId, build_index};

    fn scenario() -> (MemoryDom, NodeId, NodeId, FilterIndex) {
        let dom = MemoryDom::new();
        let e1 = dom.entry("e1", Some("go,rust"));
        let e2 = dom.entry("e2", Some("python"));
        let index = build_index(&dom, &Selector::element("article"));
        (dom, e1, e2, index)
    }

    #[test]
    fn test_tag_filter_shows_matching_entries() {
        let (dom, e1, e2, index) = scenario();

        let outcome = apply_filter(&dom, &index, &ActiveFilter::Tag("rust".into()));
        assert!(dom.is_visible(e1));
        assert!(!dom.is_visible(e2));
        assert_eq!(
            outcome,
            FilterOutcome {
                shown: 1,
                hidden: 1,
                missing: 0
            }
        );
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let (dom, e1, e2, index) = scenario();
        apply_filter(&dom, &index, &ActiveFilter::Tag("python".into()));
        assert!(!dom.is_visible(e1));

        apply_filter(&dom, &index, &ActiveFilter::from_fragment(Some("")));
        assert!(dom.is_visible(e1));
        assert!(dom.is_visible(e2));
        assert_eq!(dom.style(e1), None);
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let (dom, e1, e2, index) = scenario();
        let filter = ActiveFilter::Tag("go".into());

        apply_filter(&dom, &index, &filter);
        let once = (dom.style(e1), dom.style(e2));
        apply_filter(&dom, &index, &filter);
        let twice = (dom.style(e1), dom.style(e2));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_exactly_matching_entries_are_visible() {
        let dom = MemoryDom::new();
        let nodes = [
            (dom.entry("a", Some("rust,wasm")), true),
            (dom.entry("b", Some("Rust")), false),
            (dom.entry("c", Some(" rust")), false),
            (dom.entry("d", None), false),
            (dom.entry("e", Some("php,rust")), true),
        ];
        let index = build_index(&dom, &Selector::element("article"));

        apply_filter(&dom, &index, &ActiveFilter::Tag("rust".into()));
        for (node, expected) in nodes {
            assert_eq!(dom.is_visible(node), expected, "{:?}", node);
        }
    }

    #[test]
    fn test_missing_node_is_skipped() {
        let (dom, e1, e2, index) = scenario();
        dom.remove(e1);

        let outcome = apply_filter(&dom, &index, &ActiveFilter::Tag("rust".into()));
        assert_eq!(outcome.missing, 1);
        assert_eq!(outcome.hidden, 1);
        assert!(!dom.is_visible(e2));
    }

    #[test]
    fn test_replaced_node_is_found_by_id() {
        let (dom, e1, _e2, index) = scenario();
        dom.remove(e1);
        let replacement = dom.entry("e1", Some("go,rust"));

        apply_filter(&dom, &index, &ActiveFilter::Tag("python".into()));
        assert!(!dom.is_visible(replacement));
    }
}
