// src/catalog.rs
//! The currently published pool of categorized articles.
//!
//! Publication is copy-and-swap: the new batch is built off to the side
//! and installed by replacing the inner `Arc`. A reader's `snapshot` keeps
//! the catalog it started with alive, so it observes either the full old
//! or the full new catalog — never a partial mix.

use std::sync::{Arc, RwLock};

use crate::types::Article;

#[derive(Debug, Default)]
pub struct FeedCatalog {
    current: RwLock<Arc<Vec<Article>>>,
}

impl FeedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog wholesale. An empty batch is a valid
    /// publication and empties the catalog.
    pub fn publish(&self, articles: Vec<Article>) {
        let mut current = self.current.write().expect("feed catalog lock poisoned");
        *current = Arc::new(articles);
    }

    /// Cheap shared snapshot of the current catalog.
    pub fn snapshot(&self) -> Arc<Vec<Article>> {
        let current = self.current.read().expect("feed catalog lock poisoned");
        Arc::clone(&current)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
