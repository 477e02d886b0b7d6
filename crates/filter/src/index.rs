use folio_core::{FilterIndex, parse_tags};
use tracing::debug;

use crate::dom::{Dom, Selector};
use crate::{ENTRY_ID_ATTRIBUTE, TAGS_ATTRIBUTE};

/// Read every entry matched by `selector` into a [`FilterIndex`].
///
/// Entries without a tag attribute get an empty tag list. Nodes without an
/// id cannot be looked up again and are skipped. No matches is an empty
/// index.
pub fn build_index<D: Dom + ?Sized>(dom: &D, selector: &Selector) -> FilterIndex {
    let mut index = FilterIndex::new();

    for node in dom.find_nodes_matching(selector) {
        let Some(id) = dom.attribute(&node, ENTRY_ID_ATTRIBUTE) else {
            debug!(%selector, "skipping entry without {}", ENTRY_ID_ATTRIBUTE);
            continue;
        };
        let tags = parse_tags(dom.attribute(&node, TAGS_ATTRIBUTE).as_deref());
        index.insert(id, tags);
    }

    debug!(%selector, entries = index.len(), "built filter index");
    index
}
