//! Blog RSS feed.
//!
//! Drafts stay out of the feed. Entries are ordered newest first; undated
//! entries go last, in source order.

use chrono::{NaiveDate, NaiveTime};
use folio_core::{ContentEntry, Error, Result, RssConfig, SiteMetadata};
use rss::{Category, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use tracing::debug;

/// Entries that make it into the feed, in feed order
pub fn feed_entries<'a>(entries: &'a [ContentEntry], config: &RssConfig) -> Vec<&'a ContentEntry> {
    let mut items: Vec<&ContentEntry> = entries.iter().filter(|e| !e.data.draft).collect();
    items.sort_by(|a, b| b.data.date.cmp(&a.data.date));
    if let Some(limit) = config.limit {
        items.truncate(limit);
    }
    items
}

/// Render the RSS 2.0 document for the blog collection.
///
/// `base_url` is the absolute origin entry links are built on.
pub fn render_feed(
    site: &SiteMetadata,
    base_url: &str,
    entries: &[ContentEntry],
    config: &RssConfig,
) -> Result<String> {
    let base_url = base_url.trim_end_matches('/');
    let entries = feed_entries(entries, config);
    debug!(count = entries.len(), "generating RSS feed");

    let last_build = entries
        .iter()
        .filter_map(|e| e.data.update.max(e.data.date))
        .max();
    let items: Vec<Item> = entries
        .iter()
        .map(|entry| entry_to_item(base_url, entry))
        .collect();

    let channel = ChannelBuilder::default()
        .title(&site.title)
        .link(base_url)
        .description(&site.description)
        .last_build_date(last_build.map(rfc2822))
        .items(items)
        .build();

    let bytes = channel
        .write_to(Vec::new())
        .map_err(|e| Error::InvalidData(format!("RSS build error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
}

fn entry_to_item(base_url: &str, entry: &ContentEntry) -> Item {
    let url = format!("{}{}", base_url, entry.url());
    let guid = GuidBuilder::default().value(&url).permalink(true).build();

    let mut builder = ItemBuilder::default();
    builder.title(Some(entry.data.title.clone()));
    builder.link(Some(url));
    builder.guid(Some(guid));

    if let Some(date) = entry.data.date {
        builder.pub_date(Some(rfc2822(date)));
    }

    let description = entry
        .data
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&entry.excerpt);
    if !description.is_empty() {
        builder.description(Some(description.to_string()));
    }

    let categories: Vec<Category> = entry
        .data
        .tags
        .iter()
        .map(|tag| Category {
            name: tag.clone(),
            domain: None,
        })
        .collect();
    if !categories.is_empty() {
        builder.categories(categories);
    }

    builder.build()
}

/// Dates carry no time of day; they are published at midnight UTC
fn rfc2822(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Collection;
    use folio_core::testing::entry;

    fn site() -> SiteMetadata {
        SiteMetadata {
            title: "Mario Yepes Blog".to_string(),
            description: "Mario Yepes Portfolio and Blog".to_string(),
            base_url: Some("https://marioyepes.com".to_string()),
        }
    }

    fn dated(slug: &str, date: Option<(i32, u32, u32)>) -> ContentEntry {
        let mut e = entry(slug, Collection::Blog);
        e.data.date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        e
    }

    fn slugs(entries: &[&ContentEntry]) -> Vec<String> {
        entries.iter().map(|e| e.slug.clone()).collect()
    }

    #[test]
    fn test_feed_orders_newest_first_and_drops_drafts() {
        let mut draft = dated("wip", Some((2024, 1, 1)));
        draft.data.draft = true;
        let entries = vec![
            dated("old", Some((2019, 5, 1))),
            dated("undated", None),
            draft,
            dated("new", Some((2023, 2, 3))),
        ];

        let items = feed_entries(&entries, &RssConfig::default());
        assert_eq!(slugs(&items), vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_feed_limit() {
        let entries = vec![
            dated("a", Some((2020, 1, 1))),
            dated("b", Some((2021, 1, 1))),
            dated("c", Some((2022, 1, 1))),
        ];
        let config = RssConfig {
            limit: Some(2),
            ..Default::default()
        };

        assert_eq!(slugs(&feed_entries(&entries, &config)), vec!["c", "b"]);
    }

    #[test]
    fn test_render_feed() {
        let mut post = dated("hello", Some((2021, 3, 4)));
        post.data.title = "Hello World".to_string();
        post.data.tags = vec!["rust".to_string(), "wasm".to_string()];
        post.data.description = Some("First post".to_string());
        let plain = dated("plain", Some((2020, 1, 1)));

        let xml = render_feed(
            &site(),
            "https://marioyepes.com/",
            &[post, plain],
            &RssConfig::default(),
        )
        .unwrap();

        assert!(xml.contains("<title>Mario Yepes Blog</title>"));
        assert!(xml.contains("<link>https://marioyepes.com</link>"));
        assert!(xml.contains("<title>Hello World</title>"));
        assert!(xml.contains("<link>https://marioyepes.com/blog/hello/</link>"));
        assert!(xml.contains("<description>First post</description>"));
        assert!(xml.contains("<category>rust</category>"));
        assert!(xml.contains("Mar 2021 00:00:00 +0000"));
        // Falls back to the excerpt without a description
        assert!(xml.contains("<description>Body of plain.</description>"));
        assert!(xml.find("blog/hello/").unwrap() < xml.find("blog/plain/").unwrap());
    }

    #[test]
    fn test_last_build_date_uses_latest_update() {
        let mut post = dated("hello", Some((2021, 3, 4)));
        post.data.update = NaiveDate::from_ymd_opt(2022, 6, 7);

        let xml = render_feed(
            &site(),
            "https://marioyepes.com",
            &[post],
            &RssConfig::default(),
        )
        .unwrap();
        assert!(xml.contains("<lastBuildDate>"));
        assert!(xml.contains("Jun 2022"));
    }

    #[test]
    fn test_empty_feed_is_still_a_channel() {
        let xml = render_feed(&site(), "https://marioyepes.com", &[], &RssConfig::default())
            .unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }
}
