// src/trends.rs
//! # Trend Tracking
//! Cumulative per-keyword occurrence counts and sentiment histories across
//! every processed batch. Counters only grow; histories are append-only;
//! there is no eviction or decay.
//!
//! Keyword extraction and sentiment estimation here are cheap heuristics
//! local to trend analysis. They are intentionally NOT the enrichment
//! collaborator's output: trend tracking runs its own tokenizer over the
//! title and its own word lists over the summary.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::types::{Article, Sentiment};

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "of", "in", "on", "at", "to", "for", "from", "by",
        "with", "as", "is", "are", "was", "were", "be", "been", "it", "its", "this", "that",
        "these", "those", "their", "his", "her", "our", "your", "will", "would", "could", "should",
        "has", "have", "had", "not", "no", "up", "down", "over", "under", "after", "before",
        "into", "out", "about", "amid", "says", "say", "said", "new",
    ]
    .into_iter()
    .collect()
});

/// Words the local heuristic reads as positive/negative. A short list on
/// purpose; the enrichment lexicon is richer and scored, and the two may
/// disagree on the same text.
const UPBEAT: &[&str] = &[
    "surge", "gain", "gains", "win", "boost", "record", "growth", "rally", "strong", "soar",
];
const GLOOMY: &[&str] = &[
    "crash", "loss", "losses", "fall", "fear", "cuts", "slump", "weak", "crisis", "plunge",
];

#[derive(Debug, Default)]
struct Inner {
    frequency: HashMap<String, u64>,
    sentiment_history: HashMap<String, Vec<Sentiment>>,
}

/// Thread-safe cumulative trend store, shared by `Arc`.
#[derive(Debug, Default)]
pub struct TrendTracker {
    inner: Mutex<Inner>,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch into the trend store. Each article contributes +1 to
    /// every keyword in its title's extracted set and appends the
    /// article's estimated sentiment to each of those keywords' histories.
    pub fn analyze_trends(&self, articles: &[Article]) {
        if articles.is_empty() {
            return;
        }

        let mut inner = self.inner.lock().expect("trend tracker mutex poisoned");
        for article in articles {
            let keywords = extract_keywords(&article.title);
            let sentiment = estimate_sentiment(&article.summary);
            for keyword in keywords {
                *inner.frequency.entry(keyword.clone()).or_insert(0) += 1;
                inner
                    .sentiment_history
                    .entry(keyword)
                    .or_default()
                    .push(sentiment);
            }
        }
    }

    pub fn frequency_of(&self, keyword: &str) -> u64 {
        let inner = self.inner.lock().expect("trend tracker mutex poisoned");
        inner.frequency.get(keyword).copied().unwrap_or(0)
    }

    pub fn sentiment_history_of(&self, keyword: &str) -> Vec<Sentiment> {
        let inner = self.inner.lock().expect("trend tracker mutex poisoned");
        inner
            .sentiment_history
            .get(keyword)
            .cloned()
            .unwrap_or_default()
    }

    /// Highest-frequency keywords, frequency desc then alphabetic so the
    /// output is stable for equal counts.
    pub fn top_keywords(&self, n: usize) -> Vec<(String, u64)> {
        let inner = self.inner.lock().expect("trend tracker mutex poisoned");
        let mut all: Vec<(String, u64)> = inner
            .frequency
            .iter()
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        all.truncate(n);
        all
    }

    /// Number of distinct keywords tracked so far (the store is unbounded;
    /// this is the number to watch).
    pub fn tracked_keywords(&self) -> usize {
        let inner = self.inner.lock().expect("trend tracker mutex poisoned");
        inner.frequency.len()
    }
}

/// Keywords from a title: lower-cased alphanumeric tokens, stop-words and
/// single characters removed, duplicates within one title counted once.
pub fn extract_keywords(title: &str) -> BTreeSet<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .filter(|t| t.len() >= 2 && !STOP_WORDS.contains(t.as_str()))
        .collect()
}

/// Word-list vote over the summary. Coarser than the enrichment lexicon
/// and free of negation handling.
fn estimate_sentiment(text: &str) -> Sentiment {
    let mut upbeat = 0usize;
    let mut gloomy = 0usize;
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
    {
        if UPBEAT.contains(&token.as_str()) {
            upbeat += 1;
        } else if GLOOMY.contains(&token.as_str()) {
            gloomy += 1;
        }
    }
    match upbeat.cmp(&gloomy) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
