// src/acquire/providers/fixture.rs
//! In-memory provider serving canned batches, keyed by query. Used by the
//! demo binary and tests; unknown queries yield empty results ("no
//! matches" is never an error).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::acquire::{AcquireQuery, ArticleProvider};
use crate::types::{RawArticle, Result};

pub struct FixtureProvider {
    name: String,
    batches: HashMap<AcquireQuery, Vec<RawArticle>>,
}

impl FixtureProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batches: HashMap::new(),
        }
    }

    pub fn with_batch(mut self, query: AcquireQuery, batch: Vec<RawArticle>) -> Self {
        self.batches.insert(query, batch);
        self
    }
}

#[async_trait]
impl ArticleProvider for FixtureProvider {
    async fn fetch(&self, query: &AcquireQuery) -> Result<Vec<RawArticle>> {
        Ok(self.batches.get(query).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_query_yields_empty_batch() {
        let provider = FixtureProvider::new("canned");
        let out = provider
            .fetch(&AcquireQuery::Topic("anything".into()))
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
