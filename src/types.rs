// src/types.rs
//! Shared data model and the crate error taxonomy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type Result<T> = std::result::Result<T, CuratorError>;

#[derive(Debug, thiserror::Error)]
pub enum CuratorError {
    #[error("acquisition failed for {query}: {message}")]
    Acquisition { query: String, message: String },
    #[error("enrichment failed for {link}: {message}")]
    Enrichment { link: String, message: String },
    #[error("invalid training data: {0}")]
    Training(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed parse error: {0}")]
    FeedParse(#[from] quick_xml::DeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CuratorError {
    pub fn acquisition(query: impl Into<String>, message: impl ToString) -> Self {
        Self::Acquisition {
            query: query.into(),
            message: message.to_string(),
        }
    }

    pub fn enrichment(link: impl Into<String>, message: impl ToString) -> Self {
        Self::Enrichment {
            link: link.into(),
            message: message.to_string(),
        }
    }
}

/// Sentiment classification attached to articles and trend histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String, // e.g., "ORG", "PERSON", "GPE"
}

/// Producer output of the acquisition boundary, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published_at: u64, // unix seconds; 0 when the producer has no timestamp
}

/// Derived signals produced by the enrichment collaborator for one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub entities: Vec<Entity>,
    pub sentiment: Sentiment,
    pub summary: String,
}

/// A fully processed article as it appears in the feed catalog.
///
/// `category` is `None` between enrichment and categorization; every
/// published catalog entry carries `Some(..)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub entities: Vec<Entity>,
    pub sentiment: Sentiment,
    pub category: Option<String>,
    pub published_at: u64,
}

impl Article {
    /// Combine a raw article with its enrichment. The enriched summary
    /// replaces the producer's summary; the id is derived from the link.
    pub fn from_raw(raw: RawArticle, enrichment: Enrichment) -> Self {
        Self {
            id: link_digest(&raw.link),
            title: raw.title,
            summary: enrichment.summary,
            link: raw.link,
            entities: enrichment.entities,
            sentiment: enrichment.sentiment,
            category: None,
            published_at: raw.published_at,
        }
    }
}

/// One labeled example for classifier training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub category: String,
}

/// Short stable id for an article link (first 8 bytes of its SHA-256, hex).
pub fn link_digest(link: &str) -> String {
    let digest = Sha256::digest(link.as_bytes());
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}
