//! Browser binding over `web-sys`.
//!
//! Build for `wasm32-unknown-unknown` with the `web` feature and call
//! `activateTagFilter()` from the page's activation hook (for example
//! `astro:page-load`).

use std::cell::RefCell;

use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HashChangeEvent, Window};

use crate::binder::{BinderConfig, activate};
use crate::dom::{ClickListener, Dom, HIDDEN_STYLE, HashChangeListener, Selector, Visibility};

type HashChangeClosure = Closure<dyn FnMut(HashChangeEvent)>;

thread_local! {
    /// The window's installed `hashchange` closure, kept so it can be removed
    static HASH_LISTENER: RefCell<Option<HashChangeClosure>> = const { RefCell::new(None) };
}

/// Handle to the page's document
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// The current window's document, if running in a page
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn current_url(&self) -> Option<String> {
        self.window.location().href().ok()
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn find_nodes_matching(&self, selector: &Selector) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&selector.to_string()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_node_visibility(&self, node: &Element, visibility: Visibility) {
        let result = match visibility {
            Visibility::Visible => node.remove_attribute("style"),
            Visibility::Hidden => node.set_attribute("style", HIDDEN_STYLE),
        };
        if result.is_err() {
            debug!("could not update entry style");
        }
    }

    fn add_click_listener(&self, node: &Element, listener: ClickListener) {
        let closure = Closure::wrap(listener);
        if node
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .is_ok()
        {
            // Owned by the element from now on
            closure.forget();
        }
    }

    fn set_hash_change_listener(&self, mut listener: HashChangeListener) {
        let closure = Closure::wrap(Box::new(move |event: HashChangeEvent| {
            listener(&event.new_url());
        }) as Box<dyn FnMut(HashChangeEvent)>);
        HASH_LISTENER.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(previous) = slot.take()
                && self
                    .window
                    .remove_event_listener_with_callback(
                        "hashchange",
                        previous.as_ref().unchecked_ref(),
                    )
                    .is_err()
            {
                debug!("could not remove previous hashchange listener");
            }
            if self
                .window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
                .is_ok()
            {
                *slot = Some(closure);
            }
        });
    }
}

/// Bind the tag filter to the current page. Returns the number of entries
/// indexed; zero when not running in a page.
#[wasm_bindgen(js_name = activateTagFilter)]
pub fn activate_tag_filter() -> usize {
    let Some(dom) = WebDom::current() else {
        return 0;
    };
    let url = dom.current_url().unwrap_or_default();
    activate(&dom, &BinderConfig::default(), &url).index().len()
}
