//! Keeps the listing in sync with the URL fragment.
//!
//! The host calls [`activate`] on every page activation. Each call builds a
//! fresh index and binds fresh click listeners; listeners left on replaced
//! nodes never fire again. The window's fragment listener is replaced on
//! every call, so only the latest index answers `hashchange`.

use std::rc::Rc;

use folio_core::{ActiveFilter, FilterIndex};
use tracing::{debug, info, warn};
use url::Url;

use crate::dom::{Dom, Selector};
use crate::index::build_index;
use crate::resolver::apply_filter;

/// Base used to resolve link targets when the page URL itself is unusable
const FALLBACK_BASE: &str = "http://localhost/";

#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Entries to index
    pub entry_selector: Selector,
    /// Candidate links; only fragment links back to the current page are bound
    pub link_selector: Selector,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            entry_selector: Selector::element("article"),
            link_selector: Selector::element("a"),
        }
    }
}

/// Result of one page activation
#[derive(Debug, Clone)]
pub struct Binding {
    index: Rc<FilterIndex>,
    initial_filter: ActiveFilter,
    bound_links: usize,
}

impl Binding {
    pub fn index(&self) -> &FilterIndex {
        &self.index
    }

    /// Filter read from the page URL at activation
    pub fn initial_filter(&self) -> &ActiveFilter {
        &self.initial_filter
    }

    pub fn bound_links(&self) -> usize {
        self.bound_links
    }
}

/// The filter carried by a URL's fragment. Unparseable URLs mean no filter.
pub fn filter_from_url(url: &str) -> ActiveFilter {
    match Url::parse(url) {
        Ok(parsed) => ActiveFilter::from_fragment(parsed.fragment()),
        Err(e) => {
            debug!(url, error = %e, "unparseable url, showing everything");
            ActiveFilter::All
        }
    }
}

/// Filter a link would select, or `None` unless it targets a fragment of
/// `page` itself
fn link_target(page: &Url, href: &str) -> Option<ActiveFilter> {
    let mut target = Url::options().base_url(Some(page)).parse(href).ok()?;
    let filter = ActiveFilter::from_fragment(Some(target.fragment()?));

    target.set_fragment(None);
    let mut current = page.clone();
    current.set_fragment(None);
    (target == current).then_some(filter)
}

/// Index the page, apply the current fragment and bind navigation.
///
/// Clicks on fragment links apply the link's *target* fragment right away
/// instead of waiting for `hashchange`, which page transitions do not
/// reliably fire. A `hashchange` listener covers the hosts that do fire it.
pub fn activate<D>(dom: &D, config: &BinderConfig, current_url: &str) -> Binding
where
    D: Dom + Clone + 'static,
{
    let index = Rc::new(build_index(dom, &config.entry_selector));
    let initial_filter = filter_from_url(current_url);

    if !initial_filter.is_all() {
        apply_filter(dom, &index, &initial_filter);
    }

    let page = match Url::parse(current_url) {
        Ok(page) => Some(page),
        Err(e) => {
            warn!(url = current_url, error = %e, "resolving links against {}", FALLBACK_BASE);
            Url::parse(FALLBACK_BASE).ok()
        }
    };

    let mut bound_links = 0;
    if let Some(page) = page {
        for link in dom.find_nodes_matching(&config.link_selector) {
            let Some(href) = dom.attribute(&link, "href") else {
                continue;
            };
            let Some(target) = link_target(&page, &href) else {
                continue;
            };

            let handle = dom.clone();
            let index = Rc::clone(&index);
            dom.add_click_listener(
                &link,
                Box::new(move || {
                    apply_filter(&handle, &index, &target);
                }),
            );
            bound_links += 1;
        }
    }

    let handle = dom.clone();
    let hash_index = Rc::clone(&index);
    dom.set_hash_change_listener(Box::new(move |new_url: &str| {
        apply_filter(&handle, &hash_index, &filter_from_url(new_url));
    }));

    info!(
        entries = index.len(),
        links = bound_links,
        filter = %initial_filter,
        "tag filter activated"
    );

    Binding {
        index,
        initial_filter,
        bound_links,
    }
}
