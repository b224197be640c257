// src/pipeline.rs
//! # Aggregation Pipeline
//! `NewsCurator` owns the collaborators and every piece of core state
//! (trend store, categorizer, preferences, catalog, reward weights) and
//! exposes the four-operation public surface: `run_cycle`,
//! `set_preferences`, `recommend`, `receive_reward`.
//!
//! One cycle: acquire (failed queries are skipped) -> normalize/dedup ->
//! enrich (failed articles are dropped) -> trend update -> categorize ->
//! atomic catalog publication. A cycle that acquires nothing still
//! completes and publishes an empty catalog.

use std::collections::BTreeSet;
use std::sync::Arc;

use metrics::{counter, gauge};
use tracing::{info, warn};

use crate::acquire::{self, ArticleProvider, CycleRequest};
use crate::catalog::FeedCatalog;
use crate::categorize::Categorizer;
use crate::enrich::Enricher;
use crate::feedback::FeedbackLearner;
use crate::preferences::PreferenceStore;
use crate::recommend::RecommendationEngine;
use crate::trends::TrendTracker;
use crate::types::{Article, Result, TrainingExample};

/// Per-cycle accounting, mostly for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Raw articles returned by the provider across all queries.
    pub acquired: usize,
    /// Queries skipped because the provider failed them.
    pub queries_failed: usize,
    /// Articles dropped by normalization + deduplication.
    pub deduplicated: usize,
    /// Articles dropped because enrichment failed.
    pub enrich_failures: usize,
    /// Articles published into the catalog.
    pub published: usize,
}

pub struct NewsCurator {
    provider: Box<dyn ArticleProvider>,
    enricher: Box<dyn Enricher>,
    trends: Arc<TrendTracker>,
    categorizer: Arc<Categorizer>,
    preferences: Arc<PreferenceStore>,
    catalog: Arc<FeedCatalog>,
    engine: RecommendationEngine,
    learner: FeedbackLearner,
}

impl NewsCurator {
    pub fn new(provider: Box<dyn ArticleProvider>, enricher: Box<dyn Enricher>) -> Self {
        Self::with_categorizer(provider, enricher, Categorizer::new())
    }

    /// Construct with a preconfigured categorizer (custom default
    /// category, pre-trained model, ...).
    pub fn with_categorizer(
        provider: Box<dyn ArticleProvider>,
        enricher: Box<dyn Enricher>,
        categorizer: Categorizer,
    ) -> Self {
        let preferences = Arc::new(PreferenceStore::new());
        let catalog = Arc::new(FeedCatalog::new());
        let learner = FeedbackLearner::new(Arc::clone(&preferences));
        let engine = RecommendationEngine::new(Arc::clone(&catalog), Arc::clone(&preferences));
        engine.set_policy(learner.policy());

        Self {
            provider,
            enricher,
            trends: Arc::new(TrendTracker::new()),
            categorizer: Arc::new(categorizer),
            preferences,
            catalog,
            engine,
            learner,
        }
    }

    /// Run one full ingestion cycle. Per-query and per-article failures
    /// are recovered locally; the cycle itself completes and publishes.
    pub async fn run_cycle(&self, request: &CycleRequest) -> Result<CycleReport> {
        let (raw, queries_failed) = acquire::fetch_all(self.provider.as_ref(), request).await;
        let acquired = raw.len();
        let (kept, deduplicated) =
            acquire::normalize_and_dedup(raw, acquire::DEFAULT_SIMILARITY_THRESHOLD);

        let mut batch: Vec<Article> = Vec::with_capacity(kept.len());
        let mut enrich_failures = 0usize;
        for raw_article in kept {
            match self.enricher.enrich(&raw_article.summary).await {
                Ok(enrichment) => batch.push(Article::from_raw(raw_article, enrichment)),
                Err(e) => {
                    enrich_failures += 1;
                    counter!("curator_enrich_failures_total").increment(1);
                    warn!(error = %e, link = %raw_article.link, "enrichment failed; dropping article");
                }
            }
        }

        self.trends.analyze_trends(&batch);
        let batch = self.categorizer.categorize(batch);
        let published = batch.len();
        self.catalog.publish(batch);

        counter!("curator_cycle_runs_total").increment(1);
        counter!("curator_published_total").increment(published as u64);
        gauge!("curator_last_cycle_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let report = CycleReport {
            acquired,
            queries_failed,
            deduplicated,
            enrich_failures,
            published,
        };
        info!(
            acquired = report.acquired,
            queries_failed = report.queries_failed,
            dedup = report.deduplicated,
            dropped = report.enrich_failures,
            published = report.published,
            "ingestion cycle complete"
        );
        Ok(report)
    }

    /// Wholesale overwrite of the user's preferred categories.
    pub fn set_preferences(&self, user_id: &str, categories: BTreeSet<String>) {
        self.preferences.set(user_id, categories);
    }

    pub fn preferences_of(&self, user_id: &str) -> Option<BTreeSet<String>> {
        self.preferences.get(user_id)
    }

    /// Candidate articles for the user under the current catalog,
    /// preferences, and ranking policy.
    pub fn recommend(&self, user_id: &str) -> Vec<Article> {
        self.engine.recommend(user_id)
    }

    /// Record a reward and immediately fold it into the ranking policy
    /// against the current catalog.
    pub fn receive_reward(&self, user_id: &str, reward: f32) {
        self.learner.receive_reward(user_id, reward);
        let snapshot = self.catalog.snapshot();
        self.learner.update_policy(&snapshot);
    }

    /// Route training data to the categorizer; a malformed batch leaves
    /// the prior model in place.
    pub fn train_categorizer(&self, examples: &[TrainingExample]) -> Result<()> {
        self.categorizer.train(examples)
    }

    pub fn trends(&self) -> &TrendTracker {
        &self.trends
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    pub fn learner(&self) -> &FeedbackLearner {
        &self.learner
    }
}
