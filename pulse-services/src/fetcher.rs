//! Concurrent source fetching
//!
//! Every enabled source is fetched as its own future, bounded by a timeout.
//! A failing source contributes no articles and never blocks the others.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, warn};

use pulse_core::SourceConfig;
use pulse_news::{build_source, AdapterSettings, ArticleSource, RawArticle};

/// Outcome of fetching one source
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub name: String,
    /// Article count on success, error text on failure
    pub outcome: Result<usize, String>,
    pub elapsed: Duration,
}

impl SourceReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Union of fetched articles plus one report per attempted source
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub articles: Vec<RawArticle>,
    pub reports: Vec<SourceReport>,
}

/// Adapters keyed by source name
pub struct Fetcher {
    adapters: HashMap<String, Arc<dyn ArticleSource>>,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            adapters: HashMap::new(),
            timeout,
        }
    }

    /// Build adapters for every configured source
    ///
    /// Sources whose adapter cannot be built are left unregistered and show up
    /// as failures when fetched.
    pub fn from_configs(configs: &[SourceConfig], settings: &AdapterSettings) -> Self {
        let mut fetcher = Self::new(settings.timeout);
        for config in configs {
            match build_source(config, settings) {
                Ok(adapter) => fetcher.register(adapter),
                Err(e) => warn!("Skipping adapter for {}: {}", config.name, e),
            }
        }
        fetcher
    }

    pub fn register(&mut self, adapter: Arc<dyn ArticleSource>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn has_adapter(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    /// Fetch every enabled source in `configs` concurrently
    pub async fn fetch_all(&self, configs: &[SourceConfig]) -> FetchOutcome {
        let fetches = configs
            .iter()
            .filter(|config| config.enabled)
            .map(|config| self.fetch_one(&config.name));

        let mut outcome = FetchOutcome::default();
        for (name, result, elapsed) in join_all(fetches).await {
            let report_outcome = match result {
                Ok(mut articles) => {
                    for article in &mut articles {
                        article.source.clone_from(&name);
                    }
                    debug!("Fetched {} articles from {} in {:?}", articles.len(), name, elapsed);
                    let count = articles.len();
                    outcome.articles.extend(articles);
                    Ok(count)
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}", name, e);
                    Err(e)
                }
            };
            outcome.reports.push(SourceReport {
                name,
                outcome: report_outcome,
                elapsed,
            });
        }

        outcome
    }

    async fn fetch_one(&self, name: &str) -> (String, Result<Vec<RawArticle>, String>, Duration) {
        let started = Instant::now();

        let Some(adapter) = self.adapters.get(name) else {
            return (name.to_string(), Err("no adapter registered".to_string()), started.elapsed());
        };

        let result = match tokio::time::timeout(self.timeout, adapter.fetch()).await {
            Ok(Ok(articles)) => Ok(articles),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.timeout)),
        };

        (name.to_string(), result, started.elapsed())
    }
}
