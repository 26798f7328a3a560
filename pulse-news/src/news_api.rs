//! JSON news aggregator API client
//!
//! Talks to a NewsAPI-compatible `top-headlines` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info, instrument};

use pulse_core::SourceKind;

use crate::error::NewsError;
use crate::html::strip_html;
use crate::source::ArticleSource;
use crate::types::{NewsApiArticle, NewsApiResponse, RawArticle};

/// Articles requested per call
const PAGE_SIZE: usize = 100;

/// News aggregator API client
pub struct NewsApiSource {
    client: Client,
    name: String,
    api_key: String,
    base_url: String,
    category: String,
}

impl NewsApiSource {
    /// Create a new API source
    ///
    /// `base_url` is the API root (e.g. `https://newsapi.org`); `category` is passed
    /// through as the upstream category filter.
    pub fn new(
        name: &str,
        base_url: &str,
        api_key: String,
        category: &str,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        if api_key.trim().is_empty() {
            return Err(NewsError::InvalidConfig(format!(
                "{} requires an API key",
                name
            )));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            name: name.to_string(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            category: category.to_string(),
        })
    }

    fn convert(&self, article: NewsApiArticle) -> RawArticle {
        RawArticle {
            source: self.name.clone(),
            title: article.title.map(|t| strip_html(&t)),
            description: article.description.map(|d| strip_html(&d)),
            url: article.url,
            published_at: article
                .published_at
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Utc)),
            author: article.author.filter(|a| !a.trim().is_empty()),
        }
    }
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::NewsApi
    }

    #[instrument(skip(self), fields(source = %self.name))]
    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        let page_size = PAGE_SIZE.to_string();
        let mut request = self
            .client
            .get(format!("{}/v2/top-headlines", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&[("language", "en"), ("pageSize", page_size.as_str())]);

        if !self.category.is_empty() {
            request = request.query(&[("category", self.category.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        if payload.status != "ok" {
            return Err(NewsError::ApiError {
                status: 200,
                message: payload
                    .message
                    .or(payload.code)
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            });
        }

        info!(
            "Received {} articles from {} (total available: {:?})",
            payload.articles.len(),
            self.name,
            payload.total_results
        );

        let articles: Vec<RawArticle> = payload
            .articles
            .into_iter()
            .map(|a| self.convert(a))
            .collect();

        debug!("Converted {} articles from {}", articles.len(), self.name);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = NewsApiSource::new(
            "Headlines",
            "https://newsapi.org",
            "  ".to_string(),
            "business",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(NewsError::InvalidConfig(_))));
    }

    #[test]
    fn test_convert_article() {
        let source = NewsApiSource::new(
            "Headlines",
            "https://newsapi.org/",
            "key".to_string(),
            "business",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(source.base_url, "https://newsapi.org");

        let json = r#"{
            "source": {"id": null, "name": "Reuters"},
            "author": "",
            "title": "Oil prices slump as supply grows",
            "description": "Brent <b>falls</b> 3%",
            "url": "https://example.com/oil",
            "publishedAt": "2025-06-01T12:30:00Z"
        }"#;
        let article: NewsApiArticle = serde_json::from_str(json).unwrap();
        let raw = source.convert(article);

        assert_eq!(raw.source, "Headlines");
        assert_eq!(raw.description.as_deref(), Some("Brent falls 3%"));
        assert!(raw.author.is_none(), "blank author is dropped");
        assert!(raw.published_at.is_some());
    }
}
