// src/recommend.rs
//! # Recommendation Engine
//! Pure read over the feed catalog and the preference store:
//!
//! - a user with no stored preferences gets the entire catalog in catalog
//!   order;
//! - a user with preferences gets exactly the catalog articles whose
//!   category is in the set, catalog order preserved (an empty stored set
//!   therefore filters everything out);
//! - the installed ranking policy is then applied to that filtered set.
//!
//! The policy is a swappable strategy; `CatalogOrder` is the identity
//! default until the feedback learner installs its reward-weighted one.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::catalog::FeedCatalog;
use crate::preferences::PreferenceStore;
use crate::types::Article;

/// Ranking transform applied to an already-filtered candidate list.
/// Implementations must be stable: articles they consider equal keep
/// their relative (catalog) order.
pub trait RankingPolicy: Send + Sync {
    fn rank(&self, user_id: &str, articles: &mut Vec<Article>);
    fn name(&self) -> &'static str;
}

/// Identity policy: candidates stay in catalog order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogOrder;

impl RankingPolicy for CatalogOrder {
    fn rank(&self, _user_id: &str, _articles: &mut Vec<Article>) {}

    fn name(&self) -> &'static str {
        "catalog-order"
    }
}

pub struct RecommendationEngine {
    catalog: Arc<FeedCatalog>,
    preferences: Arc<PreferenceStore>,
    policy: RwLock<Arc<dyn RankingPolicy>>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<FeedCatalog>, preferences: Arc<PreferenceStore>) -> Self {
        Self {
            catalog,
            preferences,
            policy: RwLock::new(Arc::new(CatalogOrder)),
        }
    }

    /// Swap in a new ranking policy for all subsequent `recommend` calls.
    pub fn set_policy(&self, policy: Arc<dyn RankingPolicy>) {
        info!(policy = policy.name(), "ranking policy installed");
        *self.policy.write().expect("ranking policy lock poisoned") = policy;
    }

    /// Candidate articles for the user. Mutates nothing; operates on a
    /// catalog snapshot, so a concurrently running ingestion cycle is
    /// either fully visible or not at all.
    pub fn recommend(&self, user_id: &str) -> Vec<Article> {
        let snapshot = self.catalog.snapshot();

        let mut picked: Vec<Article> = match self.preferences.get(user_id) {
            None => snapshot.iter().cloned().collect(),
            Some(preferred) => snapshot
                .iter()
                .filter(|article| {
                    article
                        .category
                        .as_deref()
                        .is_some_and(|category| preferred.contains(category))
                })
                .cloned()
                .collect(),
        };

        let policy = self
            .policy
            .read()
            .expect("ranking policy lock poisoned")
            .clone();
        policy.rank(user_id, &mut picked);
        picked
    }
}
