//! Curated source list and adapter construction

use std::sync::Arc;
use std::time::Duration;

use pulse_core::{SourceConfig, SourceKind};

use crate::error::NewsError;
use crate::news_api::NewsApiSource;
use crate::rss_client::RssSource;
use crate::scraper::PageScraper;
use crate::source::ArticleSource;

/// Settings shared by every adapter built from configuration
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Key for the JSON news API (API sources are skipped without one)
    pub news_api_key: Option<String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            news_api_key: None,
        }
    }
}

/// Curated list of market news sources
pub fn curated_sources() -> Vec<SourceConfig> {
    vec![
        // Financial News
        SourceConfig::new(
            "CNBC Top News",
            SourceKind::Rss,
            "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100003114",
            "markets",
            0.85,
        ),
        SourceConfig::new(
            "MarketWatch",
            SourceKind::Rss,
            "https://feeds.content.dowjones.io/public/rss/mw_topstories",
            "markets",
            0.8,
        ),
        SourceConfig::new(
            "Yahoo Finance",
            SourceKind::Rss,
            "https://finance.yahoo.com/news/rssindex",
            "markets",
            0.75,
        ),
        SourceConfig::new(
            "Nasdaq",
            SourceKind::Rss,
            "https://www.nasdaq.com/feed/rssoutbound?category=Markets",
            "markets",
            0.75,
        ),
        // Economics
        SourceConfig::new(
            "Federal Reserve",
            SourceKind::Rss,
            "https://www.federalreserve.gov/feeds/press_all.xml",
            "economics",
            0.95,
        ),
        // Crypto specific
        SourceConfig::new(
            "CoinDesk",
            SourceKind::Rss,
            "https://www.coindesk.com/arc/outboundfeeds/rss/",
            "crypto",
            0.7,
        ),
        SourceConfig::new(
            "Cointelegraph",
            SourceKind::Rss,
            "https://cointelegraph.com/rss",
            "crypto",
            0.6,
        ),
        // Aggregator API - needs NEWSAPI_KEY
        SourceConfig::new(
            "NewsAPI Business",
            SourceKind::NewsApi,
            "https://newsapi.org",
            "business",
            0.7,
        ),
        // Scraped pages
        SourceConfig::new(
            "Reuters Markets",
            SourceKind::Scrape,
            "https://www.reuters.com/markets/",
            "markets",
            0.9,
        ),
    ]
}

/// Build the adapter for one configured source
pub fn build_source(
    config: &SourceConfig,
    settings: &AdapterSettings,
) -> Result<Arc<dyn ArticleSource>, NewsError> {
    let source: Arc<dyn ArticleSource> = match config.kind {
        SourceKind::Rss => Arc::new(RssSource::new(&config.name, &config.url, settings.timeout)),
        SourceKind::Scrape => {
            Arc::new(PageScraper::new(&config.name, &config.url, settings.timeout))
        }
        SourceKind::NewsApi => {
            let api_key = settings.news_api_key.clone().ok_or_else(|| {
                NewsError::InvalidConfig(format!("{} requires NEWSAPI_KEY", config.name))
            })?;
            Arc::new(NewsApiSource::new(
                &config.name,
                &config.url,
                api_key,
                &config.category,
                settings.timeout,
            )?)
        }
    };

    Ok(source)
}
