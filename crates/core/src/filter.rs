use std::fmt;

/// A filterable entry on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry {
    pub id: String,
    pub tags: Vec<String>,
}

impl TaggedEntry {
    pub fn new(id: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            tags,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Entry id to tags, in document order.
///
/// Ids are unique. Inserting an id that is already present replaces its tags
/// but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterIndex {
    entries: Vec<TaggedEntry>,
}

impl FilterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, tags: Vec<String>) {
        let id = id.into();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => existing.tags = tags,
            None => self.entries.push(TaggedEntry { id, tags }),
        }
    }

    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.tags.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaggedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TaggedEntry> for FilterIndex {
    fn from_iter<I: IntoIterator<Item = TaggedEntry>>(iter: I) -> Self {
        let mut index = FilterIndex::new();
        for entry in iter {
            index.insert(entry.id, entry.tags);
        }
        index
    }
}

/// The tag currently selected through the URL fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ActiveFilter {
    /// No filter, every entry is shown
    #[default]
    All,
    Tag(String),
}

impl ActiveFilter {
    /// Build the filter from a URL fragment, with or without its leading `#`.
    ///
    /// The token is used verbatim: no trimming, case folding or decoding.
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        match fragment.map(|f| f.strip_prefix('#').unwrap_or(f)) {
            None | Some("") => ActiveFilter::All,
            Some(tag) => ActiveFilter::Tag(tag.to_string()),
        }
    }

    /// Whether an entry carrying `tags` is visible under this filter
    pub fn admits(&self, tags: &[String]) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Tag(tag) => tags.iter().any(|t| t == tag),
        }
    }

    pub fn as_tag(&self) -> Option<&str> {
        match self {
            ActiveFilter::All => None,
            ActiveFilter::Tag(tag) => Some(tag),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ActiveFilter::All)
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveFilter::All => f.write_str("(all)"),
            ActiveFilter::Tag(tag) => write!(f, "#{}", tag),
        }
    }
}

/// Parse the comma separated tag attribute of an entry.
///
/// A missing attribute and an empty one both mean "no tags". Tokens are kept
/// exactly as written.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        None | Some("") => Vec::new(),
        Some(list) => list.split(',').map(str::to_string).collect(),
    }
}
