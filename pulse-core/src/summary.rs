//! Derived sentiment statistics over the stored article window

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::article::Sector;

/// A ranked name with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

impl RankedCount {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Aggregated sentiment over the most recent articles
///
/// Never persisted; recomputed from the store on each request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean sentiment across the window (0.0 when empty)
    pub overall_sentiment: f64,
    /// Mean sentiment per sector present in the window
    pub sector_sentiment: BTreeMap<Sector, f64>,
    pub total_articles: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub high_impact_count: usize,
    /// Tickers by mention frequency, most mentioned first
    pub trending_tickers: Vec<RankedCount>,
    /// Articles per source, largest first
    pub source_breakdown: Vec<RankedCount>,
    /// Most prolific authors, largest first
    pub top_authors: Vec<RankedCount>,
    pub generated_at: DateTime<Utc>,
}

impl SentimentSummary {
    /// Summary of an empty window
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            overall_sentiment: 0.0,
            sector_sentiment: BTreeMap::new(),
            total_articles: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            high_impact_count: 0,
            trending_tickers: Vec::new(),
            source_breakdown: Vec::new(),
            top_authors: Vec::new(),
            generated_at,
        }
    }
}
