//! In-memory document.
//!
//! Stands in for a browser document outside wasm: a flat list of elements
//! with attributes, plus recorded listeners that tests fire explicitly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{ClickListener, Dom, HIDDEN_STYLE, HashChangeListener, Selector, Visibility};
use crate::{ENTRY_ID_ATTRIBUTE, TAGS_ATTRIBUTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct MemoryNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    attached: bool,
}

#[derive(Default)]
struct Inner {
    nodes: RefCell<Vec<MemoryNode>>,
    click_listeners: RefCell<Vec<(NodeId, ClickListener)>>,
    hash_listener: RefCell<Option<HashChangeListener>>,
}

/// Shared handle to an in-memory document. Clones see the same document.
#[derive(Clone, Default)]
pub struct MemoryDom {
    inner: Rc<Inner>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return its handle
    pub fn append(&self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.inner.nodes.borrow_mut();
        nodes.push(MemoryNode {
            tag: tag.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            attached: true,
        });
        NodeId(nodes.len() - 1)
    }

    /// Append an `<article>` the way listing pages render entries
    pub fn entry(&self, id: &str, tags: Option<&str>) -> NodeId {
        match tags {
            Some(tags) => self.append(
                "article",
                &[(ENTRY_ID_ATTRIBUTE, id), (TAGS_ATTRIBUTE, tags)],
            ),
            None => self.append("article", &[(ENTRY_ID_ATTRIBUTE, id)]),
        }
    }

    /// Append an `<a>` pointing at `href`
    pub fn link(&self, href: &str) -> NodeId {
        self.append("a", &[("href", href)])
    }

    /// Detach a node, as a page transition replacing it would
    pub fn remove(&self, node: NodeId) {
        if let Some(n) = self.inner.nodes.borrow_mut().get_mut(node.0) {
            n.attached = false;
        }
    }

    /// Inline style of a node, if any
    pub fn style(&self, node: NodeId) -> Option<String> {
        self.inner
            .nodes
            .borrow()
            .get(node.0)
            .and_then(|n| n.attributes.get("style").cloned())
    }

    pub fn visibility(&self, node: NodeId) -> Visibility {
        match self.style(node).as_deref() {
            Some(HIDDEN_STYLE) => Visibility::Hidden,
            _ => Visibility::Visible,
        }
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.visibility(node) == Visibility::Visible
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner
            .click_listeners
            .borrow()
            .iter()
            .filter(|(id, _)| *id == node)
            .count()
    }

    /// Number of installed fragment change listeners, zero or one
    pub fn hash_listener_count(&self) -> usize {
        usize::from(self.inner.hash_listener.borrow().is_some())
    }

    /// Fire the click listeners of an attached node
    pub fn click(&self, node: NodeId) {
        if !self.is_attached(node) {
            return;
        }
        // Listeners may touch the document, so run them with the list released
        let mut listeners = std::mem::take(&mut *self.inner.click_listeners.borrow_mut());
        for (id, listener) in listeners.iter_mut() {
            if *id == node {
                listener();
            }
        }
        let mut current = self.inner.click_listeners.borrow_mut();
        let added = std::mem::replace(&mut *current, listeners);
        current.extend(added);
    }

    /// Fire the fragment change listener with the new URL
    pub fn change_hash(&self, new_url: &str) {
        let Some(mut listener) = self.inner.hash_listener.borrow_mut().take() else {
            return;
        };
        listener(new_url);
        // A listener installed while this one ran takes precedence
        let mut slot = self.inner.hash_listener.borrow_mut();
        if slot.is_none() {
            *slot = Some(listener);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.inner
            .nodes
            .borrow()
            .get(node.0)
            .is_some_and(|n| n.attached)
    }
}

impl MemoryNode {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Element(name) => self.tag.eq_ignore_ascii_case(name),
            Selector::AttributeEquals { name, value } => {
                self.attributes.get(name).is_some_and(|v| v == value)
            }
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn find_nodes_matching(&self, selector: &Selector) -> Vec<NodeId> {
        self.inner
            .nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attached && n.matches(selector))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner
            .nodes
            .borrow()
            .get(node.0)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_node_visibility(&self, node: &NodeId, visibility: Visibility) {
        let mut nodes = self.inner.nodes.borrow_mut();
        let Some(n) = nodes.get_mut(node.0).filter(|n| n.attached) else {
            return;
        };
        match visibility {
            Visibility::Visible => {
                n.attributes.remove("style");
            }
            Visibility::Hidden => {
                n.attributes
                    .insert("style".to_string(), HIDDEN_STYLE.to_string());
            }
        }
    }

    fn add_click_listener(&self, node: &NodeId, listener: ClickListener) {
        self.inner
            .click_listeners
            .borrow_mut()
            .push((*node, listener));
    }

    fn set_hash_change_listener(&self, listener: HashChangeListener) {
        *self.inner.hash_listener.borrow_mut() = Some(listener);
    }
}
