//! Article data structures for market news sentiment

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market sector an article is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Healthcare,
    Finance,
    Energy,
    Consumer,
    Industrial,
    RealEstate,
    Materials,
    Utilities,
    Communications,
    Cryptocurrency,
    /// Fallback when no sector keyword wins
    General,
}

impl Sector {
    /// Every sector, in classification order
    pub const ALL: [Sector; 12] = [
        Sector::Technology,
        Sector::Healthcare,
        Sector::Finance,
        Sector::Energy,
        Sector::Consumer,
        Sector::Industrial,
        Sector::RealEstate,
        Sector::Materials,
        Sector::Utilities,
        Sector::Communications,
        Sector::Cryptocurrency,
        Sector::General,
    ];

    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Finance => "Finance",
            Sector::Energy => "Energy",
            Sector::Consumer => "Consumer",
            Sector::Industrial => "Industrial",
            Sector::RealEstate => "Real Estate",
            Sector::Materials => "Materials",
            Sector::Utilities => "Utilities",
            Sector::Communications => "Communications",
            Sector::Cryptocurrency => "Cryptocurrency",
            Sector::General => "General",
        }
    }
}

impl Default for Sector {
    fn default() -> Self {
        Sector::General
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "technology" | "tech" => Ok(Sector::Technology),
            "healthcare" | "health" => Ok(Sector::Healthcare),
            "finance" | "financial" | "financials" => Ok(Sector::Finance),
            "energy" => Ok(Sector::Energy),
            "consumer" => Ok(Sector::Consumer),
            "industrial" | "industrials" => Ok(Sector::Industrial),
            "realestate" => Ok(Sector::RealEstate),
            "materials" => Ok(Sector::Materials),
            "utilities" => Ok(Sector::Utilities),
            "communications" | "telecom" => Ok(Sector::Communications),
            "cryptocurrency" | "crypto" => Ok(Sector::Cryptocurrency),
            "general" => Ok(Sector::General),
            _ => Err(format!("Unknown sector: {}", s)),
        }
    }
}

/// Coarse estimate of an article's market significance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl Default for ImpactLevel {
    fn default() -> Self {
        ImpactLevel::Low
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImpactLevel::High => "HIGH",
            ImpactLevel::Medium => "MEDIUM",
            ImpactLevel::Low => "LOW",
        };
        write!(f, "{}", label)
    }
}

/// A normalized, scored news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque unique identifier
    pub id: String,
    /// Name of the originating feed
    pub source: String,
    /// Article headline (never empty)
    pub headline: String,
    /// Brief summary/excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Bullish/bearish framing strength (-1.0 - 1.0)
    pub sentiment_score: f64,
    /// Classified sector
    pub sector: Sector,
    /// Estimated market impact
    pub impact_level: ImpactLevel,
    /// Known ticker symbols mentioned in the text
    #[serde(default)]
    pub tickers_mentioned: BTreeSet<String>,
    /// How on-topic the article is for market news (0.0 - 1.0)
    pub relevance_score: f64,
    /// Publication date reported by the source
    pub published_date: DateTime<Utc>,
    /// When the article entered the pipeline
    pub created_date: DateTime<Utc>,
    /// Last modification
    pub updated_date: DateTime<Utc>,
    /// Article URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Author byline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Orderings supported when listing stored articles (all descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSort {
    /// Newest first
    #[default]
    CreatedDate,
    /// Most bullish first
    SentimentScore,
    /// HIGH, then MEDIUM, then LOW
    ImpactLevel,
    /// Most relevant first
    RelevanceScore,
}

impl std::str::FromStr for ArticleSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created_date" | "createddate" | "date" | "recent" => Ok(ArticleSort::CreatedDate),
            "sentiment_score" | "sentimentscore" | "sentiment" => Ok(ArticleSort::SentimentScore),
            "impact_level" | "impactlevel" | "impact" => Ok(ArticleSort::ImpactLevel),
            "relevance_score" | "relevancescore" | "relevance" => Ok(ArticleSort::RelevanceScore),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Fields a caller supplies when creating an article by hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub source: String,
    pub headline: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
}
