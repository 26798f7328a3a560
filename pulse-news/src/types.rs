//! Raw article records and API-specific payload types

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A loosely-typed article as delivered by a source adapter
///
/// Every text field may be absent; normalization decides what survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    /// Configured name of the source that produced this article
    pub source: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

impl RawArticle {
    pub fn new(source: &str, title: &str) -> Self {
        Self {
            source: source.to_string(),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }
}

// ============================================================================
// News API Types
// ============================================================================

/// Top-headlines response
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    /// "ok" or "error"
    pub status: String,
    /// Total number of results available
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
    /// Articles (absent on error)
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    /// Error code (e.g., "apiKeyInvalid")
    #[serde(default)]
    pub code: Option<String>,
    /// Error message
    #[serde(default)]
    pub message: Option<String>,
}

/// A single News API article
#[derive(Debug, Deserialize)]
pub struct NewsApiArticle {
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Publication date (ISO 8601)
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}
