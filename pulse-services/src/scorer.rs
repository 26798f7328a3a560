//! Rule-based article scoring
//!
//! Sentiment, sector, impact, tickers and relevance are all computed from
//! whole-word lexicon matches over the headline and summary text.

use std::collections::BTreeSet;

use pulse_core::{ImpactLevel, Sector};

use crate::lexicon::Lexicon;

/// Lexicon term split into the tokens it must match consecutively
#[derive(Debug, Clone)]
struct Term {
    tokens: Vec<String>,
}

impl Term {
    fn new(text: &str) -> Self {
        Self {
            tokens: tokenize(text),
        }
    }

    /// Number of whole-word occurrences in the token stream
    fn occurrences(&self, tokens: &[String]) -> usize {
        if self.tokens.is_empty() || self.tokens.len() > tokens.len() {
            return 0;
        }
        tokens
            .windows(self.tokens.len())
            .filter(|window| *window == self.tokens.as_slice())
            .count()
    }

    fn is_present(&self, tokens: &[String]) -> bool {
        self.occurrences(tokens) > 0
    }
}

fn compile(terms: &[String]) -> Vec<Term> {
    terms
        .iter()
        .map(|t| Term::new(t))
        .filter(|t| !t.tokens.is_empty())
        .collect()
}

/// Split text into lower-cased alphanumeric words
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Every score the pipeline derives from article text
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub sentiment: f64,
    pub sector: Sector,
    pub impact: ImpactLevel,
    pub tickers: BTreeSet<String>,
    pub relevance: f64,
}

/// Compiled lexicon ready for matching
#[derive(Debug, Clone)]
pub struct Scorer {
    sentiment_increment: f64,
    intensifier_factor: f64,
    positive: Vec<Term>,
    negative: Vec<Term>,
    intensifiers: Vec<Term>,
    high_impact: Vec<Term>,
    medium_impact: Vec<Term>,
    relevance_increment: f64,
    relevance_cap: f64,
    numeral_bonus: f64,
    relevance_terms: Vec<Term>,
    sectors: Vec<(Sector, Vec<Term>)>,
    tickers: Vec<(String, Term)>,
}

impl Scorer {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            sentiment_increment: lexicon.sentiment.increment,
            intensifier_factor: lexicon.sentiment.intensifier_factor,
            positive: compile(&lexicon.sentiment.positive),
            negative: compile(&lexicon.sentiment.negative),
            intensifiers: compile(&lexicon.sentiment.intensifiers),
            high_impact: compile(&lexicon.impact.high),
            medium_impact: compile(&lexicon.impact.medium),
            relevance_increment: lexicon.relevance.increment,
            relevance_cap: lexicon.relevance.max_keyword_contribution,
            numeral_bonus: lexicon.relevance.numeral_bonus,
            relevance_terms: compile(&lexicon.relevance.keywords),
            sectors: lexicon
                .sectors
                .iter()
                .map(|bucket| (bucket.sector, compile(&bucket.keywords)))
                .collect(),
            tickers: lexicon
                .tickers
                .iter()
                .map(|symbol| (symbol.to_uppercase(), Term::new(symbol)))
                .filter(|(_, term)| !term.tokens.is_empty())
                .collect(),
        }
    }

    /// Score headline plus summary in one pass over the tokens
    pub fn score(&self, headline: &str, summary: &str) -> Scores {
        let tokens = tokenize(&combined_text(headline, summary));
        Scores {
            sentiment: self.sentiment_of(&tokens),
            sector: self.sector_of(&tokens),
            impact: self.impact_of(&tokens),
            tickers: self.tickers_in(&tokens),
            relevance: self.relevance_of(&tokens, headline),
        }
    }

    /// Lexicon sentiment in [-1, 1]
    pub fn sentiment_score(&self, text: &str) -> f64 {
        self.sentiment_of(&tokenize(text))
    }

    /// Winning sector, `General` on ties or no matches
    pub fn classify_sector(&self, text: &str) -> Sector {
        self.sector_of(&tokenize(text))
    }

    pub fn classify_impact(&self, text: &str) -> ImpactLevel {
        self.impact_of(&tokenize(text))
    }

    pub fn extract_tickers(&self, text: &str) -> BTreeSet<String> {
        self.tickers_in(&tokenize(text))
    }

    /// Relevance in [0, 1]; the numeral bonus looks at the headline only
    pub fn relevance_score(&self, headline: &str, summary: &str) -> f64 {
        self.relevance_of(&tokenize(&combined_text(headline, summary)), headline)
    }

    fn sentiment_of(&self, tokens: &[String]) -> f64 {
        let positive: usize = self.positive.iter().map(|t| t.occurrences(tokens)).sum();
        let negative: usize = self.negative.iter().map(|t| t.occurrences(tokens)).sum();

        let mut score = (positive as f64 - negative as f64) * self.sentiment_increment;
        if self.intensifiers.iter().any(|t| t.is_present(tokens)) {
            score *= self.intensifier_factor;
        }

        score.clamp(-1.0, 1.0)
    }

    fn sector_of(&self, tokens: &[String]) -> Sector {
        let mut best = Sector::General;
        let mut best_count = 0;
        let mut tied = false;

        for (sector, terms) in &self.sectors {
            let count: usize = terms.iter().map(|t| t.occurrences(tokens)).sum();
            if count > best_count {
                best = *sector;
                best_count = count;
                tied = false;
            } else if count == best_count && count > 0 {
                tied = true;
            }
        }

        if best_count == 0 || tied {
            Sector::General
        } else {
            best
        }
    }

    fn impact_of(&self, tokens: &[String]) -> ImpactLevel {
        let high = self.high_impact.iter().filter(|t| t.is_present(tokens)).count();
        let medium = self.medium_impact.iter().filter(|t| t.is_present(tokens)).count();

        if high >= 2 {
            ImpactLevel::High
        } else if high >= 1 || medium >= 2 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    fn tickers_in(&self, tokens: &[String]) -> BTreeSet<String> {
        self.tickers
            .iter()
            .filter(|(_, term)| term.is_present(tokens))
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    fn relevance_of(&self, tokens: &[String], headline: &str) -> f64 {
        let hits: usize = self
            .relevance_terms
            .iter()
            .map(|t| t.occurrences(tokens))
            .sum();

        let mut score = (hits as f64 * self.relevance_increment).min(self.relevance_cap);
        if headline.chars().any(|c| c.is_ascii_digit()) {
            score += self.numeral_bonus;
        }

        score.clamp(0.0, 1.0)
    }
}

fn combined_text(headline: &str, summary: &str) -> String {
    format!("{} {}", headline, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> Scorer {
        Scorer::new(&Lexicon::builtin().unwrap())
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("S&P 500 hits all-time HIGH!"),
            vec!["s", "p", "500", "hits", "all", "time", "high"]
        );
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_sentiment_with_intensifier() {
        let score = scorer().sentiment_score("Stocks surge on strong earnings, very optimistic outlook");
        assert!((score - 0.36).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_sentiment_whole_words_only() {
        let scorer = scorer();
        // "gainsay" and "surgery" contain lexicon terms but are not matches
        assert_eq!(scorer.sentiment_score("Surgery gainsay"), 0.0);
        assert!((scorer.sentiment_score("Shares FALL as growth stalls") - 0.0).abs() < 1e-9);
        assert!(scorer.sentiment_score("Shares fall, then fall again") < 0.0);
    }

    #[test]
    fn test_sentiment_counts_each_occurrence() {
        let score = scorer().sentiment_score("rally rally rally");
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_sentiment_clamped() {
        let scorer = scorer();
        let bullish = "surge ".repeat(40);
        assert_eq!(scorer.sentiment_score(&bullish), 1.0);

        let bearish = format!("extremely {}", "crash ".repeat(40));
        assert_eq!(scorer.sentiment_score(&bearish), -1.0);
    }

    #[test]
    fn test_sector_classification() {
        let scorer = scorer();
        assert_eq!(
            scorer.classify_sector("Nvidia chip demand lifts semiconductor stocks"),
            Sector::Technology
        );
        assert_eq!(
            scorer.classify_sector("Oil and natural gas prices climb as OPEC cuts"),
            Sector::Energy
        );
        assert_eq!(scorer.classify_sector("Bitcoin and Ethereum rebound"), Sector::Cryptocurrency);
    }

    #[test]
    fn test_sector_defaults_to_general() {
        let scorer = scorer();
        assert_eq!(scorer.classify_sector("Weather is nice today"), Sector::General);
        assert_eq!(scorer.classify_sector(""), Sector::General);
        // one oil keyword against one bank keyword
        assert_eq!(scorer.classify_sector("Oil bank"), Sector::General);
    }

    #[test]
    fn test_impact_levels() {
        let scorer = scorer();
        assert_eq!(
            scorer.classify_impact("Fed weighs rate cut as inflation cools"),
            ImpactLevel::High
        );
        assert_eq!(scorer.classify_impact("Earnings due next week"), ImpactLevel::Medium);
        assert_eq!(
            scorer.classify_impact("Analyst raises price target"),
            ImpactLevel::Medium
        );
        assert_eq!(scorer.classify_impact("Company opens new office"), ImpactLevel::Low);
    }

    #[test]
    fn test_impact_counts_distinct_keywords() {
        // the same high-impact keyword twice is still one keyword
        assert_eq!(
            scorer().classify_impact("Earnings, earnings, earnings"),
            ImpactLevel::Medium
        );
    }

    #[test]
    fn test_ticker_extraction() {
        let scorer = scorer();
        let tickers = scorer.extract_tickers("aapl and NVDA lead; Brk.B flat; AAPL again");
        let expected: BTreeSet<String> = ["AAPL", "BRK.B", "NVDA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tickers, expected);

        assert!(scorer.extract_tickers("COSTLY metadata").is_empty());
        assert!(scorer
            .extract_tickers("Snow hits coin collectors; Meta spy scandal hurts Pep rally")
            .is_empty());
    }

    #[test]
    fn test_relevance() {
        let scorer = scorer();
        assert_eq!(scorer.relevance_score("Weather is nice", ""), 0.0);

        let with_numeral = scorer.relevance_score("Stocks rise 2%", "");
        assert!((with_numeral - 0.3).abs() < 1e-9);

        // keyword contribution is capped before the numeral bonus
        let capped = scorer.relevance_score(
            "Stocks stocks stocks stocks stocks stocks stocks stocks in 2025",
            "markets markets",
        );
        assert!((capped - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounds_hold_for_any_text() {
        let scorer = scorer();
        let samples = [
            "",
            "!!!",
            "very very very crash crash crash crash crash crash crash crash crash crash crash crash",
            "stocks markets shares trading 1 2 3 earnings revenue profit nasdaq dow bond yield",
            "Ünïcödé 株式 市場 surge",
        ];
        for sample in samples {
            let scores = scorer.score(sample, sample);
            assert!((-1.0..=1.0).contains(&scores.sentiment));
            assert!((0.0..=1.0).contains(&scores.relevance));
            assert!(Sector::ALL.contains(&scores.sector));
        }
    }
}
