//! Raw article normalization
//!
//! Turns one loosely-typed `RawArticle` into exactly one scored `Article`, or
//! drops it when there is no usable headline.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use pulse_core::{Article, NewArticle};
use pulse_news::RawArticle;

use crate::lexicon::Lexicon;
use crate::scorer::Scorer;

/// Maps raw articles to canonical, fully scored articles
#[derive(Debug, Clone)]
pub struct Normalizer {
    scorer: Scorer,
}

impl Normalizer {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            scorer: Scorer::new(lexicon),
        }
    }

    /// Normalize one raw article at instant `now`
    ///
    /// Returns `None` when the headline is missing or blank.
    pub fn normalize(&self, raw: &RawArticle, now: DateTime<Utc>) -> Option<Article> {
        let headline = raw.title.as_deref().map(clean_text).unwrap_or_default();
        if headline.is_empty() {
            debug!(
                "Dropping article without headline from {} ({:?})",
                raw.source, raw.url
            );
            return None;
        }

        let summary = raw
            .description
            .as_deref()
            .map(clean_text)
            .filter(|s| !s.is_empty());

        let scores = self
            .scorer
            .score(&headline, summary.as_deref().unwrap_or_default());

        Some(Article {
            id: Uuid::new_v4().to_string(),
            source: raw.source.clone(),
            headline,
            summary,
            sentiment_score: scores.sentiment,
            sector: scores.sector,
            impact_level: scores.impact,
            tickers_mentioned: scores.tickers,
            relevance_score: scores.relevance,
            published_date: raw.published_at.unwrap_or(now),
            created_date: now,
            updated_date: now,
            url: non_blank(raw.url.as_deref()),
            author: non_blank(raw.author.as_deref()),
        })
    }

    /// Normalize a batch, silently dropping articles that cannot be normalized
    pub fn normalize_batch(&self, raws: &[RawArticle], now: DateTime<Utc>) -> Vec<Article> {
        raws.iter()
            .filter_map(|raw| self.normalize(raw, now))
            .collect()
    }

    /// Normalize a hand-entered article
    pub fn normalize_new(&self, new: &NewArticle, now: DateTime<Utc>) -> Option<Article> {
        let raw = RawArticle {
            source: new.source.clone(),
            title: Some(new.headline.clone()),
            description: new.summary.clone(),
            url: new.url.clone(),
            published_at: new.published_date,
            author: new.author.clone(),
        };
        self.normalize(&raw, now)
    }
}

/// Adapters strip markup; here only whitespace is collapsed
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
