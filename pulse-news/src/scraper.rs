//! Headline scraper for news pages without a feed
//!
//! Pulls headline links out of the `<h1>`-`<h4>` headings of a fetched HTML page.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use pulse_core::SourceKind;

use crate::error::NewsError;
use crate::html::extract_date_from_url;
use crate::source::ArticleSource;
use crate::types::RawArticle;

/// Shorter link texts are navigation, not headlines
const MIN_HEADLINE_CHARS: usize = 15;

/// Maximum headlines taken from one page
const MAX_HEADLINES: usize = 50;

/// Scrapes headline links from a single page
pub struct PageScraper {
    client: Client,
    name: String,
    url: String,
}

impl PageScraper {
    pub fn new(name: &str, url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Mozilla/5.0 (compatible; PulseNews/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl ArticleSource for PageScraper {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Scrape
    }

    #[instrument(skip(self), fields(source = %self.name))]
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

        let html = response
            .text()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        let articles = extract_headlines(&html, &self.url, &self.name)?;
        debug!("Scraped {} headlines from {}", articles.len(), self.url);
        Ok(articles)
    }
}

/// Extract headline links from page markup
///
/// Handles both a link inside a heading and a heading wrapped in a link.
pub fn extract_headlines(
    html: &str,
    page_url: &str,
    source: &str,
) -> Result<Vec<RawArticle>, NewsError> {
    let base = Url::parse(page_url)
        .map_err(|e| NewsError::InvalidConfig(format!("Bad page URL {}: {}", page_url, e)))?;

    let heading_selector = Selector::parse("h1, h2, h3, h4")
        .map_err(|e| NewsError::ScrapeFailed(e.to_string()))?;
    let link_selector =
        Selector::parse("a[href]").map_err(|e| NewsError::ScrapeFailed(e.to_string()))?;

    let document = Html::parse_document(html);
    let mut seen_urls = HashSet::new();
    let mut articles = Vec::new();

    for heading in document.select(&heading_selector) {
        let Some((href, title)) = heading_link(heading, &link_selector) else {
            continue;
        };

        if title.chars().count() < MIN_HEADLINE_CHARS {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let url = resolved.to_string();

        if !seen_urls.insert(url.clone()) {
            continue;
        }

        articles.push(RawArticle {
            source: source.to_string(),
            title: Some(title),
            description: None,
            published_at: extract_date_from_url(&url),
            url: Some(url),
            author: None,
        });

        if articles.len() >= MAX_HEADLINES {
            break;
        }
    }

    if articles.is_empty() && !html.trim().is_empty() {
        debug!("No headlines matched on {}", page_url);
    }

    Ok(articles)
}

/// The link target and text for a heading, from a nested or enclosing anchor
fn heading_link<'a>(
    heading: ElementRef<'a>,
    link_selector: &Selector,
) -> Option<(&'a str, String)> {
    if let Some(link) = heading.select(link_selector).next() {
        let href = link.value().attr("href")?;
        return Some((href, element_text(link)));
    }

    let anchor = heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")?;
    let href = anchor.value().attr("href")?;
    Some((href, element_text(heading)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
