//! End-to-end pipeline tests with in-process sources and a manual clock
//!
//! Run with: cargo test -p pulse-services --test pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use pulse_core::{ArticleSort, NewArticle, SourceConfig, SourceKind};
use pulse_news::{ArticleSource, NewsError, RawArticle};
use pulse_services::{
    Clock, Fetcher, Lexicon, ManualClock, NewsRefresher, NewsService, NewsStore, PipelineConfig,
    SourceRegistry,
};

struct StaticSource {
    name: String,
    titles: Vec<String>,
}

impl StaticSource {
    fn new(name: &str, titles: &[&str]) -> Arc<dyn ArticleSource> {
        Arc::new(Self {
            name: name.to_string(),
            titles: titles.iter().map(|t| t.to_string()).collect(),
        })
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        Ok(self
            .titles
            .iter()
            .map(|t| RawArticle::new(&self.name, t))
            .collect())
    }
}

struct FailingSource {
    name: String,
}

#[async_trait]
impl ArticleSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::NewsApi
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        Err(NewsError::RequestFailed("connection refused".to_string()))
    }
}

/// First fetch is slow and returns an old story; later fetches are immediate
struct SequencedSource {
    calls: AtomicUsize,
}

#[async_trait]
impl ArticleSource for SequencedSource {
    fn name(&self) -> &str {
        "Sequenced"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec![RawArticle::new("Sequenced", "Old story from the slow refresh")])
        } else {
            Ok(vec![RawArticle::new("Sequenced", "New story from the fast refresh")])
        }
    }
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ))
}

fn build(
    sources: Vec<Arc<dyn ArticleSource>>,
    clock: Arc<ManualClock>,
    max_retained: usize,
) -> Arc<NewsService> {
    let config = PipelineConfig {
        max_retained,
        ..PipelineConfig::default()
    };

    let mut fetcher = Fetcher::new(config.fetch_timeout());
    let mut configs = Vec::new();
    for source in sources {
        configs.push(SourceConfig::new(
            source.name(),
            source.kind(),
            "https://example.com",
            "markets",
            0.5,
        ));
        fetcher.register(source);
    }

    let service = NewsService::new(
        config,
        NewsStore::in_memory(max_retained),
        SourceRegistry::new(configs),
        fetcher,
        &Lexicon::builtin().unwrap(),
    )
    .with_clock(clock as Arc<dyn Clock>);

    Arc::new(service)
}

fn new_article(headline: &str) -> NewArticle {
    NewArticle {
        source: "Manual".to_string(),
        headline: headline.to_string(),
        summary: None,
        url: None,
        author: None,
        published_date: None,
    }
}

#[tokio::test]
async fn duplicate_headlines_from_one_source_stored_once() {
    let service = build(
        vec![StaticSource::new(
            "Wire",
            &["Fed signals rate cut", "Fed signals rate cut"],
        )],
        clock(),
        100,
    );

    let stored = service.update_news().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].headline, "Fed signals rate cut");
}

#[tokio::test]
async fn refresh_keeps_ids_of_stored_articles() {
    let clock = clock();
    let service = build(
        vec![StaticSource::new("Wire", &["Oil slides as OPEC boosts output"])],
        clock.clone(),
        100,
    );

    let first = service.update_news().await;
    clock.advance(chrono::Duration::minutes(20));
    let second = service.update_news().await;

    assert_eq!(second.len(), 1);
    assert_eq!(first[0].id, second[0].id);
}

#[tokio::test]
async fn syndicated_story_across_sources_stored_once() {
    let service = build(
        vec![
            StaticSource::new("Wire", &["Apple Q3 Beat!"]),
            StaticSource::new("Desk", &["apple q3 beat"]),
        ],
        clock(),
        100,
    );

    assert_eq!(service.update_news().await.len(), 1);
}

#[tokio::test]
async fn stored_collection_never_exceeds_cap() {
    let titles: Vec<String> = (0..150)
        .map(|i| format!("Company {} posts quarterly results", i))
        .collect();
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();

    let clock = clock();
    let service = build(vec![StaticSource::new("Wire", &title_refs)], clock.clone(), 100);

    assert_eq!(service.update_news().await.len(), 100);
    clock.advance(chrono::Duration::minutes(30));
    assert_eq!(service.update_news().await.len(), 100);

    for i in 0..10 {
        service
            .create_article(new_article(&format!("Manual note {}", i)))
            .unwrap();
    }
    assert_eq!(service.list(ArticleSort::CreatedDate, None).len(), 100);
}

#[tokio::test]
async fn delete_old_news_removes_only_old_articles() {
    let clock = clock();
    let service = build(Vec::new(), clock.clone(), 100);

    for i in 0..3 {
        service
            .create_article(new_article(&format!("Old market story {}", i)))
            .unwrap();
    }
    clock.advance(chrono::Duration::days(10));
    for i in 0..7 {
        service
            .create_article(new_article(&format!("Recent market story {}", i)))
            .unwrap();
    }

    assert_eq!(service.delete_old_news(7), 3);
    let remaining = service.list(ArticleSort::CreatedDate, None);
    assert_eq!(remaining.len(), 7);
    assert!(remaining.iter().all(|a| a.headline.starts_with("Recent")));
}

#[tokio::test]
async fn all_sources_failing_on_empty_store_loads_seed_data() {
    let service = build(
        vec![
            Arc::new(FailingSource {
                name: "Api".to_string(),
            }) as Arc<dyn ArticleSource>,
            Arc::new(FailingSource {
                name: "Feed".to_string(),
            }),
        ],
        clock(),
        100,
    );

    assert!(service.is_stale());
    let stored = service.update_news().await;

    assert!(!stored.is_empty());
    assert!(!service.is_stale());
    for stats in service.get_source_stats() {
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.last_error.as_deref(), Some("Request failed: connection refused"));
    }

    // seed is only used to fill an empty store
    let again = service.update_news().await;
    assert_eq!(again.len(), stored.len());
}

#[tokio::test]
async fn staleness_follows_the_clock() {
    let clock = clock();
    let service = build(
        vec![StaticSource::new("Wire", &["Gold hits record high"])],
        clock.clone(),
        100,
    );

    assert!(service.is_stale());
    service.update_news().await;
    assert!(!service.is_stale());

    clock.advance(chrono::Duration::minutes(15));
    assert!(!service.is_stale());
    clock.advance(chrono::Duration::minutes(1));
    assert!(service.is_stale());
}

#[tokio::test]
async fn disabled_source_is_not_fetched() {
    let service = build(
        vec![
            StaticSource::new("Wire", &["Stocks rally into the close"]),
            StaticSource::new("Desk", &["Bitcoin slides below support"]),
        ],
        clock(),
        100,
    );

    service.disable_source("Desk").unwrap();
    let stored = service.update_news().await;

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].source, "Wire");

    let stats = service.get_source_stats();
    assert_eq!(stats[0].last_fetch_count, 1);
    assert!(stats[1].last_fetch.is_none());
    assert!(!service.get_news_sources()[1].enabled);
}

#[tokio::test]
async fn stale_list_triggers_background_refresh() {
    let service = build(
        vec![StaticSource::new("Wire", &["Treasury yields climb on jobs report"])],
        clock(),
        100,
    );

    assert!(service.list(ArticleSort::CreatedDate, None).is_empty());

    let mut refreshed = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if !service.is_stale() {
            refreshed = true;
            break;
        }
    }
    assert!(refreshed, "background refresh never completed");
    assert_eq!(service.list(ArticleSort::CreatedDate, None).len(), 1);
}

#[tokio::test]
async fn superseded_refresh_is_discarded() {
    let service = build(
        vec![Arc::new(SequencedSource {
            calls: AtomicUsize::new(0),
        }) as Arc<dyn ArticleSource>],
        clock(),
        100,
    );

    let (_, latest) = tokio::join!(service.update_news(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.update_news().await
    });

    let stored = service.list(ArticleSort::CreatedDate, None);
    assert_eq!(stored, latest);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].headline, "New story from the fast refresh");
}

#[tokio::test]
async fn summary_reflects_stored_articles() {
    let service = build(
        vec![StaticSource::new(
            "Wire",
            &[
                "NVDA shares surge on strong chip demand",
                "Oil prices plunge as recession fears grow",
                "Company opens new office",
            ],
        )],
        clock(),
        100,
    );

    service.update_news().await;
    let summary = service.get_sentiment_summary();

    assert_eq!(summary.total_articles, 3);
    assert_eq!(summary.positive_count, 1);
    assert_eq!(summary.negative_count, 1);
    assert_eq!(summary.neutral_count, 1);
    assert_eq!(summary.trending_tickers[0].name, "NVDA");
    assert_eq!(summary.source_breakdown[0].count, 3);
}

#[tokio::test]
async fn refresher_cycle_runs_full_refresh() {
    let service = build(
        vec![StaticSource::new(
            "Wire",
            &["Chipmakers rally on AI demand", "Treasury yields climb after jobs data"],
        )],
        clock(),
        100,
    );
    let refresher = NewsRefresher::new(Arc::clone(&service));

    assert_eq!(refresher.refresh().await, 2);
    assert_eq!(service.article_count(), 2);
    assert!(!service.is_stale());
}

#[tokio::test]
async fn refresher_cleanup_applies_retention_days() {
    let clock = clock();
    let service = build(Vec::new(), clock.clone(), 100);
    let refresher = NewsRefresher::new(Arc::clone(&service));

    service.create_article(new_article("Old note on bond spreads")).unwrap();
    service.create_article(new_article("Old note on copper supply")).unwrap();
    clock.advance(chrono::Duration::days(8));
    service.create_article(new_article("Fresh note on oil inventories")).unwrap();

    assert_eq!(refresher.cleanup(), 2);
    assert_eq!(service.article_count(), 1);
    assert_eq!(refresher.cleanup(), 0);
}

#[tokio::test]
async fn refresher_start_refreshes_immediately() {
    let service = build(
        vec![StaticSource::new("Wire", &["Gold hits record high on haven demand"])],
        clock(),
        100,
    );
    Arc::new(NewsRefresher::new(Arc::clone(&service))).start();

    for _ in 0..100 {
        if service.article_count() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(service.article_count(), 1);
}
