// src/enrich.rs
//! Enrichment boundary and the built-in lexicon implementation.
//!
//! `LexiconEnricher` derives all three signals without a model server:
//! - sentiment from an embedded word lexicon, with a small negation window
//!   that flips the sign of a scored word,
//! - entities from an embedded `{ regex, label }` pattern table,
//! - the summary by normalizing the text and truncating at a word boundary.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::acquire::normalize_text;
use crate::types::{Enrichment, Entity, Result, Sentiment};

/// Enrichment collaborator: text in, derived signals out.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, text: &str) -> Result<Enrichment>;
}

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

#[derive(Debug, Deserialize)]
struct EntityPattern {
    regex: String,
    label: String,
}

static ENTITY_PATTERNS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    let raw = include_str!("../entity_patterns.json");
    let patterns: Vec<EntityPattern> =
        serde_json::from_str(raw).expect("valid entity pattern table");
    patterns
        .into_iter()
        .map(|p| {
            let re = Regex::new(&p.regex).expect("valid entity regex");
            (re, p.label)
        })
        .collect()
});

const DEFAULT_SUMMARY_LIMIT: usize = 280;

#[derive(Debug, Clone)]
pub struct LexiconEnricher {
    summary_limit: usize,
}

impl LexiconEnricher {
    pub fn new() -> Self {
        Self {
            summary_limit: DEFAULT_SUMMARY_LIMIT,
        }
    }

    pub fn with_summary_limit(mut self, limit: usize) -> Self {
        self.summary_limit = limit;
        self
    }

    /// Lexicon score for a word (0 if absent).
    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (score, token count). If a negator appears within the last
    /// 1..=3 tokens before a scored word, that word's sign is inverted.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let w = tokens[i].as_str();
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));

            let base = self.word_score(w);
            if base != 0 {
                score += if negated { -base } else { base };
            }
        }

        (score, tokens.len())
    }

    pub fn sentiment_of(&self, text: &str) -> Sentiment {
        let (score, _) = self.score_text(text);
        match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// Pattern-table entity extraction; duplicates (same text + label,
    /// case-insensitive) are reported once, in pattern-table order.
    pub fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut out = Vec::new();
        for (re, label) in ENTITY_PATTERNS.iter() {
            for m in re.find_iter(text) {
                let entity_text = m.as_str().to_string();
                if seen.insert((entity_text.to_ascii_lowercase(), label.clone())) {
                    out.push(Entity {
                        text: entity_text,
                        label: label.clone(),
                    });
                }
            }
        }
        out
    }

    /// Normalize, then cut at the last word boundary under the limit.
    pub fn summarize(&self, text: &str) -> String {
        let clean = normalize_text(text);
        if clean.chars().count() <= self.summary_limit {
            return clean;
        }

        let mut out = String::new();
        for word in clean.split_whitespace() {
            let needed = word.chars().count() + usize::from(!out.is_empty());
            if out.chars().count() + needed > self.summary_limit {
                break;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        if out.is_empty() {
            // Single word longer than the limit.
            out = clean.chars().take(self.summary_limit).collect();
        }
        out
    }
}

impl Default for LexiconEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Enricher for LexiconEnricher {
    async fn enrich(&self, text: &str) -> Result<Enrichment> {
        Ok(Enrichment {
            entities: self.extract_entities(text),
            sentiment: self.sentiment_of(text),
            summary: self.summarize(text),
        })
    }
}

/// Alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

/// Single-token negators ("no longer" is covered by "no" alone after
/// tokenization).
fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
    )
}
