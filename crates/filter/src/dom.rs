//! The slice of the DOM the filter needs.

use std::fmt;

/// Inline style that hides an entry
pub const HIDDEN_STYLE: &str = "display: none";

/// Listener for a click on a node
pub type ClickListener = Box<dyn FnMut()>;

/// Listener for a fragment change; receives the new URL
pub type HashChangeListener = Box<dyn FnMut(&str)>;

/// Node query, rendered as a CSS selector for real documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every element with this tag name
    Element(String),
    /// Every element whose attribute equals the value
    AttributeEquals { name: String, value: String },
}

impl Selector {
    pub fn element(name: impl Into<String>) -> Self {
        Selector::Element(name.into())
    }

    pub fn attribute_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::AttributeEquals {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The node rendered for an entry id
    pub fn entry(id: &str) -> Self {
        Selector::attribute_equals(crate::ENTRY_ID_ATTRIBUTE, id)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Element(name) => f.write_str(name),
            Selector::AttributeEquals { name, value } => {
                write!(f, "[{}=\"{}\"]", name, escape_css_string(value))
            }
        }
    }
}

/// Escape a value for use inside a double quoted CSS string
fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            _ => out.push(c),
        }
    }
    out
}

/// Whether an entry is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Inline style cleared
    Visible,
    /// Inline style forces `display: none`
    Hidden,
}

/// Capabilities the filter needs from a document.
///
/// Methods take `&self`: a document is a shared handle and implementations
/// use interior mutability. Operations on nodes that are no longer attached
/// must be no-ops.
pub trait Dom {
    type Node: Clone;

    fn find_nodes_matching(&self, selector: &Selector) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_node_visibility(&self, node: &Self::Node, visibility: Visibility);

    fn add_click_listener(&self, node: &Self::Node, listener: ClickListener);

    /// Install the fragment change listener, replacing the one from any
    /// earlier call.
    fn set_hash_change_listener(&self, listener: HashChangeListener);
}
