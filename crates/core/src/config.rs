use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: SiteMetadata,
    #[serde(default)]
    content: RawContentConfig,
    #[serde(default)]
    redirects: RawRedirectsConfig,
    #[serde(default)]
    rss: RawRssConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawContentConfig {
    root: Option<String>,
    blog_dir: Option<String>,
    portfolio_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRedirectsConfig {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRssConfig {
    enabled: Option<bool>,
    path: Option<String>,
    limit: Option<usize>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Site> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Site> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.site.title.trim().is_empty() {
        return Err(Error::ConfigParse("site.title must not be empty".to_string()));
    }

    if let Some(base_url) = &raw.site.base_url
        && !(base_url.starts_with("https://") || base_url.starts_with("http://"))
    {
        return Err(Error::ConfigParse(format!(
            "site.base_url '{}' must be an absolute http(s) URL",
            base_url
        )));
    }

    let root = match raw.content.root {
        Some(root) => validate_path(&root, "content.root")?,
        None => PathBuf::from(DEFAULT_CONTENT_ROOT),
    };
    let blog_dir = raw
        .content
        .blog_dir
        .map(|dir| validate_path(&dir, "content.blog_dir"))
        .transpose()?;
    let portfolio_dir = raw
        .content
        .portfolio_dir
        .map(|dir| validate_path(&dir, "content.portfolio_dir"))
        .transpose()?;

    // The manifest path is both a request path and a file name in the
    // build output, so it must be a plain relative path.
    let redirects_path = match raw.redirects.path {
        Some(p) => {
            let trimmed = p.trim_start_matches('/');
            validate_path(trimmed, "redirects.path")?;
            trimmed.to_string()
        }
        None => DEFAULT_REDIRECTS_PATH.to_string(),
    };

    let rss_path = match raw.rss.path {
        Some(p) => {
            let trimmed = p.trim_start_matches('/');
            validate_path(trimmed, "rss.path")?;
            trimmed.to_string()
        }
        None => DEFAULT_RSS_PATH.to_string(),
    };
    if raw.rss.limit == Some(0) {
        return Err(Error::ConfigParse("rss.limit must be at least 1".to_string()));
    }

    Ok(Site {
        site: raw.site,
        content: ContentConfig {
            root,
            blog_dir,
            portfolio_dir,
        },
        redirects: RedirectsConfig {
            path: redirects_path,
        },
        rss: RssConfig {
            enabled: raw.rss.enabled.unwrap_or(true),
            path: rss_path,
            limit: raw.rss.limit,
        },
    })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and paths containing parent directory references
/// (`..`), so a site.toml cannot point the build at files outside the site
/// directory.
///
/// # Examples
///
/// ```text
/// validate_path("src/content", "content.root")  → Ok(PathBuf)
/// validate_path("/etc", "content.root")  → Err("Absolute paths not allowed...")
/// validate_path("../other-site", "content.root")  → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
