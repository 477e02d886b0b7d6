//! Frontmatter and excerpt extraction for markdown entries.

use std::path::Path;

use folio_core::{EntryData, Error, Result};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Default excerpt length, in characters
pub const EXCERPT_LENGTH: usize = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// Delimited by `---`
    Yaml,
    /// Delimited by `+++`
    Toml,
}

impl FrontmatterFormat {
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split a document into its frontmatter block and body.
///
/// Delimiters must sit on their own line; the opening one must be the first
/// non-blank line.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches(['\u{feff}', '\n', '\r', ' ', '\t']);

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };
    let delimiter = format.delimiter();

    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end() != delimiter {
        return None;
    }
    let rest = &content[first_line_end + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse an entry's frontmatter, returning it with the markdown body
pub fn parse_entry(content: &str, path: &Path) -> Result<(EntryData, String)> {
    let Some((format, raw, body)) = split_frontmatter(content) else {
        return Err(frontmatter_error(path, "missing frontmatter block"));
    };

    let data = match format {
        FrontmatterFormat::Yaml => serde_yaml::from_str::<EntryData>(raw)
            .map_err(|e| frontmatter_error(path, e.to_string()))?,
        FrontmatterFormat::Toml => {
            let mut table: toml::Table =
                toml::from_str(raw).map_err(|e| frontmatter_error(path, e.to_string()))?;
            stringify_datetimes(&mut table);
            toml::Value::Table(table)
                .try_into::<EntryData>()
                .map_err(|e| frontmatter_error(path, e.to_string()))?
        }
    };

    if data.title.trim().is_empty() {
        return Err(frontmatter_error(path, "title must not be empty"));
    }

    Ok((data, body.to_string()))
}

fn frontmatter_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Frontmatter {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// TOML dates are native values; entry dates are read from strings
fn stringify_datetimes(table: &mut toml::Table) {
    for (_, value) in table.iter_mut() {
        match value {
            toml::Value::Datetime(dt) => {
                let text = dt.to_string();
                *value = toml::Value::String(text);
            }
            toml::Value::Table(inner) => stringify_datetimes(inner),
            _ => {}
        }
    }
}

/// Plain-text lead of a markdown body, cut at a word boundary
pub fn excerpt(markdown: &str, max_len: usize) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => {
                in_paragraph = false;
                if text.chars().count() >= max_len {
                    break;
                }
                if !text.is_empty() {
                    text.push(' ');
                }
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim_end();
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_len).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_split_yaml_frontmatter() {
        let doc = "---\ntitle: Hello\n---\n\nBody text\n";
        let (format, fm, body) = split_frontmatter(doc).unwrap();
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert_eq!(fm, "title: Hello\n");
        assert_eq!(body, "\nBody text\n");
    }

    #[test]
    fn test_split_ignores_dashes_inside_values() {
        let doc = "---\ntitle: a --- b\n---\nBody";
        let (_, fm, body) = split_frontmatter(doc).unwrap();
        assert_eq!(fm, "title: a --- b\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_frontmatter() {
        assert!(split_frontmatter("# Just markdown").is_none());
        assert!(split_frontmatter("---\ntitle: never closed\n").is_none());
        assert!(split_frontmatter("----\ntitle: x\n----\n").is_none());
    }

    #[test]
    fn test_parse_yaml_entry() {
        let doc = r#"---
title: "Sorting in PHP"
date: 2021-03-04
tags:
  - php
  - wordpress
cover: ./cover.png
---
Some text.
"#;
        let (data, body) = parse_entry(doc, Path::new("sorting.md")).unwrap();
        assert_eq!(data.title, "Sorting in PHP");
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2021, 3, 4));
        assert_eq!(data.tags, vec!["php", "wordpress"]);
        assert!(!data.draft);
        assert_eq!(body, "Some text.\n");
    }

    #[test]
    fn test_parse_toml_entry_with_native_date() {
        let doc = r#"+++
title = "Shop site"
date = 2020-01-15
tags = ["woocommerce"]
draft = true
+++
Body
"#;
        let (data, _) = parse_entry(doc, Path::new("shop.md")).unwrap();
        assert_eq!(data.title, "Shop site");
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert!(data.draft);
    }

    #[test]
    fn test_parse_entry_errors_name_the_file() {
        let err = parse_entry("no frontmatter", Path::new("blog/x.md")).unwrap_err();
        assert!(err.to_string().contains("blog/x.md"));
        assert!(err.to_string().contains("missing frontmatter"));

        let err = parse_entry("---\ntags: [a]\n---\n", Path::new("y.md")).unwrap_err();
        assert!(err.to_string().contains("y.md"));

        let err = parse_entry("---\ntitle: x\ndate: someday\n---\n", Path::new("z.md"))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_excerpt_short_body() {
        let md = "# Heading\n\nFirst *para*.\n\nSecond `code`.";
        assert_eq!(excerpt(md, EXCERPT_LENGTH), "First para. Second code.");
    }

    #[test]
    fn test_excerpt_truncates_on_word_boundary() {
        let md = "one two three four five six";
        assert_eq!(excerpt(md, 12), "one two…");
    }

    #[test]
    fn test_excerpt_empty_body() {
        assert_eq!(excerpt("", EXCERPT_LENGTH), "");
        assert_eq!(excerpt("```\ncode only\n```", EXCERPT_LENGTH), "");
    }
}
