// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod acquire;
pub mod catalog;
pub mod categorize;
pub mod enrich;
pub mod feedback;
pub mod pipeline;
pub mod preferences;
pub mod recommend;
pub mod trends;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::acquire::{AcquireQuery, ArticleProvider, CycleRequest};
pub use crate::categorize::Categorizer;
pub use crate::enrich::{Enricher, LexiconEnricher};
pub use crate::pipeline::{CycleReport, NewsCurator};
pub use crate::types::{
    Article, CuratorError, Enrichment, Entity, RawArticle, Result, Sentiment, TrainingExample,
};
