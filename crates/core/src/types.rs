use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Complete site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub site: SiteMetadata,
    pub content: ContentConfig,
    pub redirects: RedirectsConfig,
    pub rss: RssConfig,
}

/// Site-wide metadata shared by every page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    /// Absolute origin feed links are built on, e.g. `https://example.com`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Where the content collections live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_dir: Option<PathBuf>,
}

impl ContentConfig {
    /// Directory of a collection, relative to the site directory
    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        let dir = match collection {
            Collection::Blog => self.blog_dir.as_deref(),
            Collection::Portfolio => self.portfolio_dir.as_deref(),
        };
        self.root
            .join(dir.unwrap_or_else(|| Path::new(collection.dir_name())))
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            blog_dir: None,
            portfolio_dir: None,
        }
    }
}

pub const DEFAULT_CONTENT_ROOT: &str = "src/content";
pub const DEFAULT_REDIRECTS_PATH: &str = "_redirects";

/// Redirect manifest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectsConfig {
    /// Synthetic request path the manifest is served under
    pub path: String,
}

impl RedirectsConfig {
    /// True when `requested` names the manifest. A leading `/` is ignored.
    pub fn matches(&self, requested: &str) -> bool {
        strip_root(requested) == strip_root(&self.path)
    }
}

fn strip_root(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

pub const DEFAULT_RSS_PATH: &str = "rss.xml";

/// Blog feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    pub enabled: bool,
    /// Output file, relative to the build directory
    pub path: String,
    /// Newest entries kept in the feed; all of them when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_RSS_PATH.to_string(),
            limit: None,
        }
    }
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_REDIRECTS_PATH.to_string(),
        }
    }
}

/// Content collections known to the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Blog,
    Portfolio,
}

impl Collection {
    /// Every collection, in manifest order
    pub const ALL: [Collection; 2] = [Collection::Blog, Collection::Portfolio];

    /// Default directory name under the content root
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::Portfolio => "portfolio",
        }
    }

    /// First path segment of the collection's pages
    pub fn route_prefix(self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Frontmatter of a content entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    pub title: String,
    #[serde(default, with = "loose_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "loose_date")]
    pub update: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Overrides the slug derived from the file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A single blog post or portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub slug: String,
    pub collection: Collection,
    pub data: EntryData,
    /// Plain-text lead of the body, used when there is no description
    #[serde(default)]
    pub excerpt: String,
    /// Source file, relative to the collection directory
    pub source: PathBuf,
}

impl ContentEntry {
    /// Path the entry is published under
    pub fn url(&self) -> String {
        format!("/{}/{}/", self.collection.route_prefix(), self.slug)
    }

    /// Path the entry was published under before collections got prefixes
    pub fn legacy_url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

/// Why `slug` cannot be published as a path, if it can't.
///
/// A usable slug is non-empty, relative, free of whitespace and of `.`/`..`
/// segments, so it renders as a single manifest field.
pub fn slug_problem(slug: &str) -> Option<&'static str> {
    if slug.is_empty() {
        Some("is empty")
    } else if slug.starts_with('/') {
        Some("starts with '/'")
    } else if slug.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if slug.split('/').any(|segment| segment == ".." || segment == ".") {
        Some("contains a relative path segment")
    } else {
        None
    }
}

/// One line of the redirect manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    pub status: u16,
}

impl RedirectRule {
    /// Permanent redirect
    pub const STATUS: u16 = 301;

    /// Rule sending an entry's legacy URL to its collection URL
    pub fn for_entry(entry: &ContentEntry) -> Self {
        Self {
            from: entry.legacy_url(),
            to: entry.url(),
            status: Self::STATUS,
        }
    }
}

impl fmt::Display for RedirectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.to, self.status)
    }
}

/// Dates in frontmatter come as `YYYY-MM-DD` or as a full RFC 3339 timestamp
mod loose_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        parse(&raw).map(Some).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.date_naive());
        }
        // Local date-times ("2023-04-05T10:00:00") carry no offset
        raw.get(..10)
            .filter(|_| raw.as_bytes().get(10).is_some_and(|b| *b == b'T' || *b == b' '))
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .ok_or_else(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn test_redirect_rule_for_blog_entry() {
        let rule = RedirectRule::for_entry(&entry("hello", Collection::Blog));
        assert_eq!(rule.to_string(), "/hello/ /blog/hello/ 301");
    }

    #[test]
    fn test_redirect_rule_for_portfolio_entry() {
        let rule = RedirectRule::for_entry(&entry("shop-site", Collection::Portfolio));
        assert_eq!(rule.from, "/shop-site/");
        assert_eq!(rule.to, "/portfolio/shop-site/");
        assert_eq!(rule.status, 301);
    }

    #[test]
    fn test_collection_dir_defaults_and_overrides() {
        let mut content = ContentConfig::default();
        assert_eq!(
            content.collection_dir(Collection::Blog),
            PathBuf::from("src/content/blog")
        );

        content.portfolio_dir = Some(PathBuf::from("projects"));
        assert_eq!(
            content.collection_dir(Collection::Portfolio),
            PathBuf::from("src/content/projects")
        );
    }

    #[test]
    fn test_redirects_path_matching() {
        let redirects = RedirectsConfig::default();
        assert!(redirects.matches("_redirects"));
        assert!(redirects.matches("/_redirects"));
        assert!(!redirects.matches("/_headers"));
        assert!(!redirects.matches(""));
        assert!(!redirects.matches("//_redirects"));
        assert!(!redirects.matches("///_redirects"));
    }

    #[test]
    fn test_slug_problems() {
        assert_eq!(slug_problem("hello-world"), None);
        assert_eq!(slug_problem("2023/my-post"), None);
        assert_eq!(slug_problem(""), Some("is empty"));
        assert_eq!(slug_problem("/rooted"), Some("starts with '/'"));
        assert_eq!(slug_problem("my post"), Some("contains whitespace"));
        assert_eq!(slug_problem("a/../b"), Some("contains a relative path segment"));
        assert_eq!(slug_problem("./a"), Some("contains a relative path segment"));
    }

    #[test]
    fn test_loose_date_parsing() {
        assert_eq!(
            loose_date::parse("2023-04-05").unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 5).unwrap()
        );
        assert_eq!(
            loose_date::parse("2023-04-05T10:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 5).unwrap()
        );
        assert_eq!(
            loose_date::parse("2023-04-05T10:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 5).unwrap()
        );
        assert!(loose_date::parse("April 5th").is_err());
        assert!(loose_date::parse("2023-04-05junk").is_err());
    }
}
