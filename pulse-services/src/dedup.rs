//! Headline deduplication and merge
//!
//! One key is used everywhere: the headline case-folded with every
//! non-alphanumeric character removed. It collapses duplicates inside a fresh
//! batch and keeps already-stored stories from being inserted twice.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use pulse_core::Article;

/// Duplicate key for a headline
pub fn headline_key(headline: &str) -> String {
    headline
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collapse duplicates within one batch
///
/// Colliding articles keep the higher relevance (the first seen on a tie).
/// The result is ordered by relevance descending and holds at most
/// `max_retained` articles.
pub fn dedupe_batch(articles: Vec<Article>, max_retained: usize) -> Vec<Article> {
    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let key = headline_key(&article.headline);
        match index.get(&key).copied() {
            Some(slot) => {
                if article.relevance_score > kept[slot].relevance_score {
                    kept[slot] = article;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(article);
            }
        }
    }

    kept.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    kept.truncate(max_retained);
    kept
}

/// Merge a deduplicated batch into the stored collection
///
/// Fresh articles whose key is already stored are skipped, so a stored article
/// keeps its id across refreshes. The merged collection is ordered newest
/// first and capped at `max_retained`. Returns the merged collection and the
/// number of fresh articles that were inserted before the cap was applied.
pub fn merge(
    fresh: Vec<Article>,
    existing: &[Article],
    max_retained: usize,
) -> (Vec<Article>, usize) {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|a| headline_key(&a.headline))
        .collect();

    let new_articles: Vec<Article> = fresh
        .into_iter()
        .filter(|a| seen.insert(headline_key(&a.headline)))
        .collect();
    let inserted = new_articles.len();

    let mut merged = new_articles;
    merged.extend(existing.iter().cloned());
    merged.sort_by(|a, b| b.created_date.cmp(&a.created_date));
    merged.truncate(max_retained);

    (merged, inserted)
}
