//! RSS Feed Client for news aggregation
//!
//! Fetches and parses RSS/Atom feeds from configured news sources.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::debug;

use pulse_core::SourceKind;

use crate::error::NewsError;
use crate::html::{extract_date_from_url, strip_html};
use crate::source::ArticleSource;
use crate::types::RawArticle;

/// Items older than this are skipped
const MAX_ITEM_AGE_DAYS: i64 = 7;

/// A single RSS or Atom feed
pub struct RssSource {
    client: Client,
    name: String,
    url: String,
}

impl RssSource {
    /// Create a new feed source with the given request timeout
    pub fn new(name: &str, url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("PulseNews/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl ArticleSource for RssSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", self.url),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        let items = parse_feed(&content, &self.name, Utc::now())?;
        debug!("Parsed {} items from feed {}", items.len(), self.name);
        Ok(items)
    }
}

/// Parse feed bytes as RSS first, then Atom
pub fn parse_feed(
    content: &[u8],
    source: &str,
    now: DateTime<Utc>,
) -> Result<Vec<RawArticle>, NewsError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Ok(parse_rss_channel(&channel, source, now));
    }

    if let Ok(atom_feed) = atom_syndication::Feed::read_from(content) {
        return Ok(parse_atom_feed(&atom_feed, source, now));
    }

    Err(NewsError::ParseError(format!(
        "Failed to parse feed from {}",
        source
    )))
}

/// Parse RSS channel into raw articles
fn parse_rss_channel(channel: &rss::Channel, source: &str, now: DateTime<Utc>) -> Vec<RawArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let url = item.link().map(|l| l.to_string());

            let published_at = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc))
                .or_else(|| url.as_deref().and_then(extract_date_from_url));

            if is_too_old(published_at, now) {
                return None;
            }

            let author = item.author().map(|a| a.to_string()).or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.creators().first().cloned())
            });

            Some(RawArticle {
                source: source.to_string(),
                title: item.title().map(strip_html),
                description: item.description().map(strip_html),
                url,
                published_at,
                author,
            })
        })
        .collect()
}

/// Parse Atom feed into raw articles
fn parse_atom_feed(
    atom_feed: &atom_syndication::Feed,
    source: &str,
    now: DateTime<Utc>,
) -> Vec<RawArticle> {
    atom_feed
        .entries()
        .iter()
        .filter_map(|entry| {
            let url = entry.links().first().map(|l| l.href().to_string());

            // A date in the link beats the last-edited stamp
            let published_at = entry
                .published()
                .map(|d| d.with_timezone(&Utc))
                .or_else(|| url.as_deref().and_then(extract_date_from_url))
                .or_else(|| Some(entry.updated().with_timezone(&Utc)));

            if is_too_old(published_at, now) {
                return None;
            }

            let summary_html = entry.summary().map(|s| s.as_str()).unwrap_or_default();
            let content_html = entry.content().and_then(|c| c.value()).unwrap_or_default();
            let description = if !summary_html.is_empty() {
                Some(strip_html(summary_html))
            } else if !content_html.is_empty() {
                Some(strip_html(content_html))
            } else {
                None
            };

            Some(RawArticle {
                source: source.to_string(),
                title: Some(strip_html(entry.title().as_str())),
                description,
                url,
                published_at,
                author: entry.authors().first().map(|p| p.name().to_string()),
            })
        })
        .collect()
}

fn is_too_old(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    published_at
        .map(|p| (now - p).num_days() > MAX_ITEM_AGE_DAYS)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Markets</title>
    <link>https://example.com</link>
    <description>Market news</description>
    <item>
      <title>Nvidia shares &lt;b&gt;surge&lt;/b&gt; after record revenue</title>
      <link>https://example.com/2025/06/01/nvda</link>
      <description>&lt;p&gt;Chipmaker beats estimates.&lt;/p&gt;</description>
      <pubDate>Sun, 01 Jun 2025 14:00:00 +0000</pubDate>
      <dc:creator>Jane Roe</dc:creator>
    </item>
    <item>
      <title>Ancient history</title>
      <link>https://example.com/old</link>
      <pubDate>Wed, 01 Jan 2025 09:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Fed Press</title>
  <id>urn:fed</id>
  <updated>2025-06-01T10:00:00Z</updated>
  <entry>
    <title>Fed signals rate cut</title>
    <id>urn:fed:1</id>
    <link href="https://example.com/fed/1"/>
    <updated>2025-06-01T10:00:00Z</updated>
    <author><name>Press Office</name></author>
    <summary>Officials see easing ahead.</summary>
  </entry>
  <entry>
    <title>Minutes show split over balance sheet</title>
    <id>urn:fed:2</id>
    <link href="https://example.com/2025/05/30/minutes/"/>
    <updated>2025-06-01T11:00:00Z</updated>
  </entry>
</feed>"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rss_items() {
        let items = parse_feed(RSS.as_bytes(), "Wire", now()).unwrap();
        assert_eq!(items.len(), 1, "item older than a week is skipped");

        let item = &items[0];
        assert_eq!(item.source, "Wire");
        assert_eq!(
            item.title.as_deref(),
            Some("Nvidia shares surge after record revenue")
        );
        assert_eq!(item.description.as_deref(), Some("Chipmaker beats estimates."));
        assert_eq!(item.author.as_deref(), Some("Jane Roe"));
        assert_eq!(
            item.published_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_atom_entries() {
        let items = parse_feed(ATOM.as_bytes(), "Fed", now()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Fed signals rate cut"));
        assert_eq!(items[0].url.as_deref(), Some("https://example.com/fed/1"));
        assert_eq!(items[0].author.as_deref(), Some("Press Office"));
        assert_eq!(items[0].description.as_deref(), Some("Officials see easing ahead."));
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap())
        );

        assert_eq!(
            items[1].published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 30, 12, 0, 0).unwrap()),
            "date in the link wins over the update stamp"
        );
        assert!(items[1].description.is_none());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_feed(b"not a feed", "Broken", now()).unwrap_err();
        assert!(matches!(err, NewsError::ParseError(_)));
    }
}
