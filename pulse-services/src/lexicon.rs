//! Scoring lexicon
//!
//! Word lists, ticker symbols, sector keywords and scoring constants are data,
//! not code: they are read from TOML so they can be extended and tested
//! independently of the scoring rules. The default lexicon ships inside the
//! binary; `Lexicon::from_path` loads a replacement.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use pulse_core::Sector;

/// Built-in lexicon document
const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse lexicon: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid lexicon: {0}")]
    Invalid(String),
}

/// Complete scoring lexicon
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    /// Known ticker symbols
    #[serde(default)]
    pub tickers: Vec<String>,
    pub sentiment: SentimentLexicon,
    pub impact: ImpactLexicon,
    pub relevance: RelevanceLexicon,
    /// Keyword buckets per sector
    #[serde(default)]
    pub sectors: Vec<SectorKeywords>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentLexicon {
    /// Score change per positive/negative match
    pub increment: f64,
    /// Applied once when any intensifier is present
    pub intensifier_factor: f64,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    #[serde(default)]
    pub intensifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImpactLexicon {
    pub high: Vec<String>,
    pub medium: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceLexicon {
    /// Added per keyword occurrence
    pub increment: f64,
    /// Cap on the summed keyword contribution
    pub max_keyword_contribution: f64,
    /// Added when the headline contains a digit
    pub numeral_bonus: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorKeywords {
    pub sector: Sector,
    pub keywords: Vec<String>,
}

impl Lexicon {
    /// The lexicon compiled into the crate
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_toml_str(BUILTIN_LEXICON)
    }

    /// Load and validate a lexicon file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a lexicon document
    pub fn from_toml_str(content: &str) -> Result<Self, LexiconError> {
        let lexicon: Lexicon = toml::from_str(content)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    fn validate(&self) -> Result<(), LexiconError> {
        if !(self.sentiment.increment > 0.0) {
            return Err(LexiconError::Invalid(
                "sentiment.increment must be positive".to_string(),
            ));
        }
        if !(self.sentiment.intensifier_factor >= 1.0) {
            return Err(LexiconError::Invalid(
                "sentiment.intensifier_factor must be at least 1.0".to_string(),
            ));
        }
        if !(self.relevance.increment > 0.0) || !(self.relevance.max_keyword_contribution >= 0.0) {
            return Err(LexiconError::Invalid(
                "relevance increments must be positive".to_string(),
            ));
        }
        if !(self.relevance.numeral_bonus >= 0.0) {
            return Err(LexiconError::Invalid(
                "relevance.numeral_bonus must not be negative".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for bucket in &self.sectors {
            if bucket.sector == Sector::General {
                return Err(LexiconError::Invalid(
                    "General is the fallback sector and takes no keywords".to_string(),
                ));
            }
            if !seen.insert(bucket.sector) {
                return Err(LexiconError::Invalid(format!(
                    "sector {} listed twice",
                    bucket.sector
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lexicon_loads() {
        let lexicon = Lexicon::builtin().unwrap();
        assert!(lexicon.sentiment.positive.iter().any(|t| t == "surge"));
        assert!(lexicon.sentiment.intensifiers.iter().any(|t| t == "very"));
        assert!(lexicon.tickers.iter().any(|t| t == "AAPL"));
        assert_eq!(lexicon.sectors.len(), Sector::ALL.len() - 1);
        assert_eq!(lexicon.sentiment.increment, 0.1);
        assert_eq!(lexicon.sentiment.intensifier_factor, 1.2);
    }

    #[test]
    fn test_rejects_bad_factor() {
        let doc = r#"
            [sentiment]
            increment = 0.1
            intensifier_factor = 0.5
            positive = []
            negative = []

            [impact]
            high = []
            medium = []

            [relevance]
            increment = 0.1
            max_keyword_contribution = 0.6
            numeral_bonus = 0.2
            keywords = []
        "#;
        assert!(matches!(
            Lexicon::from_toml_str(doc),
            Err(LexiconError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_general_bucket() {
        let doc = r#"
            [sentiment]
            increment = 0.1
            intensifier_factor = 1.2
            positive = []
            negative = []

            [impact]
            high = []
            medium = []

            [relevance]
            increment = 0.1
            max_keyword_contribution = 0.6
            numeral_bonus = 0.2
            keywords = []

            [[sectors]]
            sector = "General"
            keywords = ["anything"]
        "#;
        assert!(matches!(
            Lexicon::from_toml_str(doc),
            Err(LexiconError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Lexicon::from_toml_str("not = [valid"),
            Err(LexiconError::Parse(_))
        ));
    }
}
