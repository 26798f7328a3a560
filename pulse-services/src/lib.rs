//! Business logic services for the market news pipeline
//!
//! This crate turns raw articles from the source adapters into a scored,
//! deduplicated collection and answers queries over it.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod dedup;
pub mod fetcher;
pub mod lexicon;
pub mod news_service;
pub mod news_store;
pub mod normalizer;
pub mod refresher;
pub mod scorer;
pub mod seed;
pub mod source_registry;

pub use aggregator::summarize;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{sources_from_json, ConfigError, PipelineConfig};
pub use dedup::{dedupe_batch, headline_key, merge};
pub use fetcher::{FetchOutcome, Fetcher, SourceReport};
pub use lexicon::{Lexicon, LexiconError};
pub use news_service::{NewsService, NewsServiceError};
pub use news_store::{NewsStore, StoreError};
pub use normalizer::Normalizer;
pub use refresher::NewsRefresher;
pub use scorer::{Scorer, Scores};
pub use source_registry::SourceRegistry;
