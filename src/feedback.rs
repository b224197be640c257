// src/feedback.rs
//! # Feedback Learner
//! Turns per-user reward signals into per-user category ranking weights.
//!
//! Update rule (the learning rule itself is a crate decision, see
//! DESIGN.md): `receive_reward` stores the most recent reward per user;
//! `update_policy` then, for each rewarded user in sorted order, moves
//! `weight[user][category]` by `LEARNING_RATE * reward` for every target
//! category that occurs in the catalog. Target categories are the user's
//! stored preferences when non-empty, otherwise every distinct catalog
//! category. Weights saturate at `±WEIGHT_CEIL`, which keeps repeated
//! positive rewards from ever lowering a weight.
//!
//! An empty catalog makes `update_policy` a no-op, and users without any
//! recorded reward keep their ranking untouched: the reward-weighted
//! policy sorts stably, so all-equal (or absent) weights preserve catalog
//! order.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::preferences::PreferenceStore;
use crate::recommend::RankingPolicy;
use crate::types::Article;

pub const LEARNING_RATE: f32 = 0.25;
pub const WEIGHT_CEIL: f32 = 4.0;

// user -> category -> ranking weight
type WeightTable = HashMap<String, HashMap<String, f32>>;

pub struct FeedbackLearner {
    rewards: RwLock<HashMap<String, f32>>,
    weights: Arc<RwLock<WeightTable>>,
    preferences: Arc<PreferenceStore>,
}

impl FeedbackLearner {
    pub fn new(preferences: Arc<PreferenceStore>) -> Self {
        Self {
            rewards: RwLock::new(HashMap::new()),
            weights: Arc::new(RwLock::new(HashMap::new())),
            preferences,
        }
    }

    /// Record the most recent reward for the user, replacing any prior
    /// value (last-write-wins).
    pub fn receive_reward(&self, user_id: &str, reward: f32) {
        let mut rewards = self.rewards.write().expect("reward record lock poisoned");
        rewards.insert(user_id.to_string(), reward);
    }

    pub fn last_reward(&self, user_id: &str) -> Option<f32> {
        let rewards = self.rewards.read().expect("reward record lock poisoned");
        rewards.get(user_id).copied()
    }

    /// Fold the recorded rewards into the weight table against the given
    /// catalog. Deterministic for a fixed reward history and catalog; safe
    /// to call with an empty catalog.
    pub fn update_policy(&self, catalog: &[Article]) {
        if catalog.is_empty() {
            return;
        }
        let catalog_categories: BTreeSet<String> = catalog
            .iter()
            .filter_map(|article| article.category.clone())
            .collect();
        if catalog_categories.is_empty() {
            return;
        }

        let rewards = {
            let guard = self.rewards.read().expect("reward record lock poisoned");
            guard.clone()
        };
        let mut users: Vec<String> = rewards.keys().cloned().collect();
        users.sort();

        let mut weights = self.weights.write().expect("weight table lock poisoned");
        for user in users {
            let reward = rewards[&user];
            let targets: BTreeSet<String> = match self.preferences.get(&user) {
                Some(preferred) if !preferred.is_empty() => preferred
                    .intersection(&catalog_categories)
                    .cloned()
                    .collect(),
                _ => catalog_categories.clone(),
            };

            let user_weights = weights.entry(user.clone()).or_default();
            for category in targets {
                let entry = user_weights.entry(category.clone()).or_insert(0.0);
                let updated = clamp_weight(*entry + LEARNING_RATE * reward);
                debug!(user = %user, category = %category, weight = updated, "category weight updated");
                *entry = updated;
            }
        }
    }

    /// Current ranking weight for (user, category); 0.0 when unknown.
    pub fn category_weight(&self, user_id: &str, category: &str) -> f32 {
        let weights = self.weights.read().expect("weight table lock poisoned");
        weights
            .get(user_id)
            .and_then(|per_user| per_user.get(category))
            .copied()
            .unwrap_or(0.0)
    }

    /// Ranking policy backed by this learner's live weight table. Install
    /// it once; later `update_policy` calls flow through automatically.
    pub fn policy(&self) -> Arc<dyn RankingPolicy> {
        Arc::new(RewardWeighted {
            weights: Arc::clone(&self.weights),
        })
    }
}

fn clamp_weight(weight: f32) -> f32 {
    weight.clamp(-WEIGHT_CEIL, WEIGHT_CEIL)
}

/// Stable descending sort by the user's category weight. Unknown users
/// and unweighted categories read as 0.0, so they keep catalog order.
struct RewardWeighted {
    weights: Arc<RwLock<WeightTable>>,
}

impl RankingPolicy for RewardWeighted {
    fn rank(&self, user_id: &str, articles: &mut Vec<Article>) {
        let table = self.weights.read().expect("weight table lock poisoned");
        let Some(user_weights) = table.get(user_id) else {
            return;
        };
        articles.sort_by(|a, b| {
            let wa = weight_of(user_weights, a);
            let wb = weight_of(user_weights, b);
            wb.total_cmp(&wa)
        });
    }

    fn name(&self) -> &'static str {
        "reward-weighted"
    }
}

fn weight_of(user_weights: &HashMap<String, f32>, article: &Article) -> f32 {
    article
        .category
        .as_deref()
        .and_then(|category| user_weights.get(category))
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{link_digest, Sentiment};

    fn article(link: &str, category: &str) -> Article {
        Article {
            id: link_digest(link),
            title: link.to_string(),
            summary: String::new(),
            link: link.to_string(),
            entities: vec![],
            sentiment: Sentiment::Neutral,
            category: Some(category.to_string()),
            published_at: 0,
        }
    }

    fn learner() -> FeedbackLearner {
        FeedbackLearner::new(Arc::new(PreferenceStore::new()))
    }

    #[test]
    fn rewards_are_last_write_wins() {
        let learner = learner();
        learner.receive_reward("1", 1.0);
        learner.receive_reward("1", -0.5);
        assert_eq!(learner.last_reward("1"), Some(-0.5));
    }

    #[test]
    fn update_with_empty_catalog_is_a_no_op() {
        let learner = learner();
        learner.receive_reward("1", 1.0);
        learner.update_policy(&[]);
        assert_eq!(learner.category_weight("1", "technology"), 0.0);
    }

    #[test]
    fn positive_rewards_never_lower_a_weight() {
        let learner = learner();
        let catalog = vec![article("https://a", "technology")];

        learner.receive_reward("1", 1.0);
        learner.update_policy(&catalog);
        let after_one = learner.category_weight("1", "technology");

        learner.receive_reward("1", 1.0);
        learner.update_policy(&catalog);
        let after_two = learner.category_weight("1", "technology");

        assert!(after_one > 0.0);
        assert!(after_two >= after_one);
    }

    #[test]
    fn weights_saturate_at_the_ceiling() {
        let learner = learner();
        let catalog = vec![article("https://a", "technology")];
        learner.receive_reward("1", 100.0);
        for _ in 0..10 {
            learner.update_policy(&catalog);
        }
        assert_eq!(learner.category_weight("1", "technology"), WEIGHT_CEIL);
    }

    #[test]
    fn preferences_narrow_the_rewarded_categories() {
        let preferences = Arc::new(PreferenceStore::new());
        preferences.set("1", ["technology".to_string()].into());
        let learner = FeedbackLearner::new(preferences);

        let catalog = vec![
            article("https://a", "technology"),
            article("https://b", "sports"),
        ];
        learner.receive_reward("1", 1.0);
        learner.update_policy(&catalog);

        assert!(learner.category_weight("1", "technology") > 0.0);
        assert_eq!(learner.category_weight("1", "sports"), 0.0);
    }

    #[test]
    fn policy_sorts_by_weight_and_keeps_ties_stable() {
        let learner = learner();
        learner.receive_reward("1", 1.0);
        // Only reward "beta": preferences are empty, so targets are the
        // catalog categories of this narrow catalog.
        learner.update_policy(&[article("https://seed", "beta")]);

        let policy = learner.policy();
        let mut candidates = vec![
            article("https://a", "alpha"),
            article("https://b", "beta"),
            article("https://c", "alpha"),
        ];
        policy.rank("1", &mut candidates);
        let links: Vec<_> = candidates.iter().map(|a| a.link.as_str()).collect();
        // "beta" floats up; the two "alpha" articles keep catalog order.
        assert_eq!(links, vec!["https://b", "https://a", "https://c"]);
    }

    #[test]
    fn users_without_rewards_keep_catalog_order() {
        let learner = learner();
        let policy = learner.policy();
        let mut candidates = vec![
            article("https://a", "alpha"),
            article("https://b", "beta"),
        ];
        policy.rank("stranger", &mut candidates);
        let links: Vec<_> = candidates.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["https://a", "https://b"]);
    }
}
