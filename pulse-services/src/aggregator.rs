//! Sentiment aggregation over the most recent articles
//!
//! Pure computation: the summary is derived from whatever collection is passed
//! in and is never stored.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use pulse_core::{Article, ArticleSort, ImpactLevel, RankedCount, Sector, SentimentSummary};

use crate::news_store::sorted;

/// Sentiment above this counts as positive, below its negation as negative
pub const NEUTRAL_BAND: f64 = 0.1;

/// Length of the trending ticker and top author rankings
pub const TOP_N: usize = 10;

/// Summarize the `window` most recently created articles
pub fn summarize(articles: &[Article], window: usize, now: DateTime<Utc>) -> SentimentSummary {
    let recent = sorted(articles, ArticleSort::CreatedDate, Some(window));
    if recent.is_empty() {
        return SentimentSummary::empty(now);
    }

    let total = recent.len();
    let overall = recent.iter().map(|a| a.sentiment_score).sum::<f64>() / total as f64;

    let mut sector_totals: BTreeMap<Sector, (f64, usize)> = BTreeMap::new();
    let mut tickers: HashMap<&str, usize> = HashMap::new();
    let mut sources: HashMap<&str, usize> = HashMap::new();
    let mut authors: HashMap<&str, usize> = HashMap::new();

    let mut positive = 0;
    let mut negative = 0;
    let mut high_impact = 0;

    for article in &recent {
        let entry = sector_totals.entry(article.sector).or_insert((0.0, 0));
        entry.0 += article.sentiment_score;
        entry.1 += 1;

        if article.sentiment_score > NEUTRAL_BAND {
            positive += 1;
        } else if article.sentiment_score < -NEUTRAL_BAND {
            negative += 1;
        }

        if article.impact_level == ImpactLevel::High {
            high_impact += 1;
        }

        for ticker in &article.tickers_mentioned {
            *tickers.entry(ticker.as_str()).or_default() += 1;
        }
        *sources.entry(article.source.as_str()).or_default() += 1;
        if let Some(author) = article.author.as_deref() {
            *authors.entry(author).or_default() += 1;
        }
    }

    SentimentSummary {
        overall_sentiment: overall,
        sector_sentiment: sector_totals
            .into_iter()
            .map(|(sector, (sum, count))| (sector, sum / count as f64))
            .collect(),
        total_articles: total,
        positive_count: positive,
        negative_count: negative,
        neutral_count: total - positive - negative,
        high_impact_count: high_impact,
        trending_tickers: rank(tickers, Some(TOP_N)),
        source_breakdown: rank(sources, None),
        top_authors: rank(authors, Some(TOP_N)),
        generated_at: now,
    }
}

/// Counts descending, ties broken alphabetically
fn rank(counts: HashMap<&str, usize>, limit: Option<usize>) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .into_iter()
        .map(|(name, count)| RankedCount::new(name, count))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
