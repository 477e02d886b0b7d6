//! Tag filtering for listing pages.
//!
//! A listing page renders one element per entry, each carrying an id
//! attribute and a comma separated tag attribute. The URL fragment selects a
//! tag; entries without that tag are hidden.
//!
//! - [`build_index`] reads the entries into a [`FilterIndex`]
//! - [`apply_filter`] shows or hides entries for an [`ActiveFilter`]
//! - [`activate`] wires both to link clicks and hash changes
//!
//! All DOM access goes through the [`Dom`] trait. [`MemoryDom`] is an
//! in-memory document; the `web` feature adds [`web::WebDom`] over `web-sys`.
//!
//! ```
//! use folio_filter::{ActiveFilter, MemoryDom, Selector, apply_filter, build_index};
//!
//! let dom = MemoryDom::new();
//! let rust = dom.entry("e1", Some("go,rust"));
//! let python = dom.entry("e2", Some("python"));
//!
//! let index = build_index(&dom, &Selector::element("article"));
//! apply_filter(&dom, &index, &ActiveFilter::Tag("rust".into()));
//!
//! assert!(dom.is_visible(rust));
//! assert!(!dom.is_visible(python));
//! ```

pub mod binder;
pub mod dom;
pub mod index;
pub mod memory;
pub mod resolver;
#[cfg(feature = "web")]
pub mod web;

pub use binder::{BinderConfig, Binding, activate, filter_from_url};
pub use dom::{ClickListener, Dom, HashChangeListener, Selector, Visibility};
pub use folio_core::{ActiveFilter, FilterIndex, TaggedEntry};
pub use index::build_index;
pub use memory::{MemoryDom, NodeId};
pub use resolver::{FilterOutcome, apply_filter};

/// Attribute holding the entry identifier
pub const ENTRY_ID_ATTRIBUTE: &str = "data-article-id";

/// Attribute holding the comma separated tags
pub const TAGS_ATTRIBUTE: &str = "data-tags";
