//! News source definitions and per-source bookkeeping

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a source delivers its articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// RSS 2.0 or Atom feed
    Rss,
    /// JSON news aggregator API
    NewsApi,
    /// Scraped HTML page
    Scrape,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Rss => "rss",
            SourceKind::NewsApi => "news_api",
            SourceKind::Scrape => "scrape",
        };
        write!(f, "{}", label)
    }
}

/// A configured news source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique source name (e.g., "CNBC Top News")
    pub name: String,
    /// Whether the source takes part in refresh cycles
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Reliability weight (0.0 - 1.0)
    #[serde(default = "default_reliability")]
    pub reliability: f64,
    /// Coarse category tag (e.g., "markets", "crypto")
    #[serde(default)]
    pub category: String,
    /// Adapter used to fetch the source
    pub kind: SourceKind,
    /// Endpoint the adapter talks to
    pub url: String,
}

impl SourceConfig {
    pub fn new(name: &str, kind: SourceKind, url: &str, category: &str, reliability: f64) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            reliability: reliability.clamp(0.0, 1.0),
            category: category.to_string(),
            kind,
            url: url.to_string(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_reliability() -> f64 {
    0.5
}

/// Fetch bookkeeping for one source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<DateTime<Utc>>,
    /// Articles returned by the most recent fetch
    pub last_fetch_count: usize,
    /// Articles returned across all fetches
    pub total_fetched: u64,
    pub failure_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl SourceStats {
    pub fn new(name: &str, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            enabled,
            ..Default::default()
        }
    }
}
