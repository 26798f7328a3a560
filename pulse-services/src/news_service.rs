//! News Service
//!
//! The pipeline object: fetch, normalize and score, deduplicate, merge into
//! the store, and answer queries over the stored collection. Constructed
//! explicitly and shared behind an `Arc`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use pulse_core::{
    Article, ArticleSort, NewArticle, PulseError, SentimentSummary, SourceConfig, SourceStats,
};

use crate::aggregator::summarize;
use crate::clock::{Clock, SystemClock};
use crate::config::PipelineConfig;
use crate::dedup::dedupe_batch;
use crate::fetcher::Fetcher;
use crate::lexicon::Lexicon;
use crate::news_store::NewsStore;
use crate::normalizer::Normalizer;
use crate::seed::seed_articles;
use crate::source_registry::SourceRegistry;

/// Market news pipeline
pub struct NewsService {
    config: PipelineConfig,
    store: NewsStore,
    registry: SourceRegistry,
    fetcher: Fetcher,
    normalizer: Normalizer,
    clock: Arc<dyn Clock>,
    /// Incremented when a refresh starts; only the latest may write
    refresh_seq: AtomicU64,
    /// Set while a background refresh spawned by `list` is running
    refresh_in_flight: AtomicBool,
}

impl NewsService {
    /// Create a new NewsService
    ///
    /// Persisted source toggles and statistics are applied to `registry`.
    pub fn new(
        config: PipelineConfig,
        store: NewsStore,
        registry: SourceRegistry,
        fetcher: Fetcher,
        lexicon: &Lexicon,
    ) -> Self {
        registry.restore(&store.load_source_stats());

        info!(
            "Initializing NewsService ({} sources, {} stored articles, persistence: {})",
            registry.sources().len(),
            store.len(),
            store.is_persistent()
        );

        Self {
            config,
            store,
            registry,
            fetcher,
            normalizer: Normalizer::new(lexicon),
            clock: Arc::new(SystemClock),
            refresh_seq: AtomicU64::new(0),
            refresh_in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stored articles in the requested order
    ///
    /// A stale collection is returned as-is while a refresh runs in the
    /// background.
    pub fn list(self: &Arc<Self>, sort: ArticleSort, limit: Option<usize>) -> Vec<Article> {
        if self.is_stale() {
            self.spawn_refresh();
        }
        self.store.list(sort, limit)
    }

    /// Start `update_news` on the current runtime unless one is already running
    ///
    /// Returns whether a refresh was spawned.
    pub fn spawn_refresh(self: &Arc<Self>) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available for background refresh");
            return false;
        };
        if self.refresh_in_flight.swap(true, Ordering::SeqCst) {
            return false;
        }

        let service = Arc::clone(self);
        handle.spawn(async move {
            service.update_news().await;
            service.refresh_in_flight.store(false, Ordering::SeqCst);
        });
        true
    }

    /// Number of stored articles
    pub fn article_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_stale(&self) -> bool {
        self.store
            .is_stale(self.clock.now(), self.config.staleness_window())
    }

    /// Run one full refresh cycle and return the stored collection
    #[instrument(skip(self))]
    pub async fn update_news(&self) -> Vec<Article> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let sources = self.registry.enabled_sources();
        info!("Refreshing news from {} sources", sources.len());

        let outcome = self.fetcher.fetch_all(&sources).await;
        let now = self.clock.now();

        for report in &outcome.reports {
            match &report.outcome {
                Ok(count) => self.registry.record_success(&report.name, *count, now),
                Err(e) => self.registry.record_failure(&report.name, e, now),
            }
        }
        self.store.save_source_stats(&self.registry.stats());

        let mut normalized = self.normalizer.normalize_batch(&outcome.articles, now);
        if normalized.is_empty() && self.store.is_empty() {
            warn!("No articles fetched and the store is empty, loading seed data");
            normalized = self.normalizer.normalize_batch(&seed_articles(), now);
        }

        let batch = dedupe_batch(normalized, self.config.max_retained);

        if self.refresh_seq.load(Ordering::SeqCst) != seq {
            info!("Discarding results of superseded refresh");
            return self.store.snapshot();
        }

        let (stored, inserted) = self.store.merge_fresh(batch);
        let failed = outcome.reports.iter().filter(|r| !r.is_ok()).count();
        info!(
            "Refresh complete: {} new articles, {} stored, {} of {} sources failed",
            inserted,
            stored.len(),
            failed,
            outcome.reports.len()
        );
        stored
    }

    pub fn get_sentiment_summary(&self) -> SentimentSummary {
        summarize(
            &self.store.snapshot(),
            self.config.summary_window,
            self.clock.now(),
        )
    }

    /// Score and store a hand-entered article
    #[instrument(skip(self, article), fields(source = %article.source))]
    pub fn create_article(&self, article: NewArticle) -> Result<Article, NewsServiceError> {
        let now = self.clock.now();
        let normalized = self
            .normalizer
            .normalize_new(&article, now)
            .ok_or_else(|| NewsServiceError::InvalidArticle("headline is required".to_string()))?;

        Ok(self.store.create(normalized, now))
    }

    pub fn get_article(&self, id: &str) -> Result<Article, NewsServiceError> {
        self.store
            .get(id)
            .ok_or_else(|| NewsServiceError::ArticleNotFound(id.to_string()))
    }

    /// Remove articles created more than `days` days ago
    #[instrument(skip(self))]
    pub fn delete_old_news(&self, days: u32) -> usize {
        self.store.delete_older_than(days, self.clock.now())
    }

    pub fn clear_cache(&self) {
        self.store.clear();
    }

    pub fn get_news_sources(&self) -> Vec<SourceConfig> {
        self.registry.sources()
    }

    pub fn enable_source(&self, name: &str) -> Result<SourceConfig, NewsServiceError> {
        let config = self
            .registry
            .enable(name)
            .ok_or_else(|| NewsServiceError::UnknownSource(name.to_string()))?;
        self.store.save_source_stats(&self.registry.stats());
        Ok(config)
    }

    pub fn disable_source(&self, name: &str) -> Result<SourceConfig, NewsServiceError> {
        let config = self
            .registry
            .disable(name)
            .ok_or_else(|| NewsServiceError::UnknownSource(name.to_string()))?;
        self.store.save_source_stats(&self.registry.stats());
        Ok(config)
    }

    pub fn get_source_stats(&self) -> Vec<SourceStats> {
        self.registry.stats()
    }
}

/// Errors that can occur in NewsService
#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Invalid article: {0}")]
    InvalidArticle(String),
}

impl From<NewsServiceError> for PulseError {
    fn from(err: NewsServiceError) -> Self {
        match err {
            NewsServiceError::UnknownSource(name) => {
                PulseError::not_found(format!("source {}", name))
            }
            NewsServiceError::ArticleNotFound(id) => {
                PulseError::not_found(format!("article {}", id))
            }
            NewsServiceError::InvalidArticle(msg) => PulseError::parse(msg),
        }
    }
}
