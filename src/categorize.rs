// src/categorize.rs
//! # Categorizer
//! Token-overlap classification against a trained term table.
//!
//! - `train` replaces the model wholesale; validation is all-or-nothing,
//!   so a malformed batch leaves the prior model (or the default) intact.
//! - `classify` is a pure function of the article text for a fixed model:
//!   highest summed term weight wins, ties break to the lexicographically
//!   smallest category, and no match yields the configured default
//!   category. Classification never fails.
//! - Training data loads from TOML or JSON files as well as in-memory
//!   examples.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use crate::types::{Article, CuratorError, Result, TrainingExample};

pub const DEFAULT_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, Default)]
struct CategoryModel {
    // token -> category -> weight
    term_weights: HashMap<String, HashMap<String, f32>>,
}

impl CategoryModel {
    fn from_examples(examples: &[TrainingExample]) -> Result<Self> {
        if examples.is_empty() {
            return Err(CuratorError::Training("no training examples".into()));
        }

        // Validate everything before building, so a bad example cannot
        // leave a half-built model behind.
        let mut tokenized = Vec::with_capacity(examples.len());
        for (i, example) in examples.iter().enumerate() {
            let category = example.category.trim().to_ascii_lowercase();
            if category.is_empty() {
                return Err(CuratorError::Training(format!(
                    "example {i} has an empty category"
                )));
            }
            let tokens: Vec<String> = tokenize(&example.text).collect();
            if tokens.is_empty() {
                return Err(CuratorError::Training(format!(
                    "example {i} has no usable tokens"
                )));
            }
            tokenized.push((tokens, category));
        }

        let mut term_weights: HashMap<String, HashMap<String, f32>> = HashMap::new();
        for (tokens, category) in tokenized {
            for token in tokens {
                *term_weights
                    .entry(token)
                    .or_default()
                    .entry(category.clone())
                    .or_insert(0.0) += 1.0;
            }
        }
        Ok(Self { term_weights })
    }

    fn classify(&self, text: &str) -> Option<String> {
        let mut scores: HashMap<String, f32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(categories) = self.term_weights.get(&token) {
                for (category, weight) in categories {
                    *scores.entry(category.clone()).or_insert(0.0) += weight;
                }
            }
        }
        // Deterministic argmax: highest score wins; on a score tie the
        // lexicographically smaller category is preferred, independent of
        // map iteration order.
        scores
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(category, _)| category)
    }
}

#[derive(Debug)]
pub struct Categorizer {
    model: RwLock<Option<CategoryModel>>,
    default_category: String,
}

impl Categorizer {
    pub fn new() -> Self {
        Self::with_default_category(DEFAULT_CATEGORY)
    }

    /// Use a custom fallback category for unmatched or untrained
    /// classification.
    pub fn with_default_category(category: impl Into<String>) -> Self {
        Self {
            model: RwLock::new(None),
            default_category: category.into(),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Replace the model wholesale. On any validation error the previous
    /// model stays in place.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<()> {
        let model = CategoryModel::from_examples(examples)?;
        *self.model.write().expect("categorizer lock poisoned") = Some(model);
        Ok(())
    }

    /// Load training data from a TOML or JSON file and train on it.
    /// TOML shape: `[[examples]] text = "..." category = "..."`;
    /// JSON accepts the same `{ "examples": [...] }` object or a bare
    /// array of examples.
    pub fn train_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let examples = parse_training_data(&content, &ext)?;
        self.train(&examples)
    }

    /// Pure classification of one article's text under the current model.
    pub fn classify(&self, article: &Article) -> String {
        let text = format!("{} {}", article.title, article.summary);
        let guard = self.model.read().expect("categorizer lock poisoned");
        match guard.as_ref() {
            Some(model) => model
                .classify(&text)
                .unwrap_or_else(|| self.default_category.clone()),
            None => self.default_category.clone(),
        }
    }

    /// Label every article; order and count are preserved.
    pub fn categorize(&self, mut articles: Vec<Article>) -> Vec<Article> {
        for article in &mut articles {
            let category = self.classify(article);
            article.category = Some(category);
        }
        articles
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(serde::Deserialize)]
struct TrainingFile {
    examples: Vec<TrainingExample>,
}

fn parse_training_data(content: &str, hint_ext: &str) -> Result<Vec<TrainingExample>> {
    // Try TOML first if hinted or the content looks like it.
    let try_toml = hint_ext == "toml" || content.contains("[[examples]]");
    if try_toml {
        if let Ok(file) = toml::from_str::<TrainingFile>(content) {
            return Ok(file.examples);
        }
    }
    if let Ok(file) = serde_json::from_str::<TrainingFile>(content) {
        return Ok(file.examples);
    }
    if let Ok(examples) = serde_json::from_str::<Vec<TrainingExample>>(content) {
        return Ok(examples);
    }
    if !try_toml {
        if let Ok(file) = toml::from_str::<TrainingFile>(content) {
            return Ok(file.examples);
        }
    }
    Err(CuratorError::Training(
        "unsupported training data format".into(),
    ))
}

/// Alphanumeric tokens of length >= 2, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(|t| t.to_ascii_lowercase())
}
