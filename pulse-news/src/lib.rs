//! News source adapters for the market news pipeline
//!
//! This crate provides adapters for fetching raw articles from:
//! - RSS/Atom feeds: Curated feeds from major financial news sources (primary)
//! - News API: JSON aggregator of top business headlines (optional, needs a key)
//! - Scraped pages: Headline links pulled from pages without a feed

pub mod catalog;
pub mod error;
pub mod html;
pub mod news_api;
pub mod rss_client;
pub mod scraper;
pub mod source;
pub mod types;

pub use catalog::{build_source, curated_sources, AdapterSettings};
pub use error::NewsError;
pub use news_api::NewsApiSource;
pub use rss_client::RssSource;
pub use scraper::PageScraper;
pub use source::ArticleSource;
pub use types::RawArticle;
