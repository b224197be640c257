// src/preferences.rs
//! Per-user preferred categories. Writes are wholesale overwrites
//! (last-write-wins, no merging); reads return an owned snapshot. Any
//! category string is accepted — there is no known-category universe to
//! validate against.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct PreferenceStore {
    inner: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total overwrite of the user's preference set. Idempotent.
    pub fn set(&self, user_id: &str, categories: BTreeSet<String>) {
        let mut inner = self.inner.write().expect("preference store lock poisoned");
        inner.insert(user_id.to_string(), categories);
    }

    /// `None` for users who never stored preferences; an empty set is a
    /// stored (and meaningful) value, distinct from absence.
    pub fn get(&self, user_id: &str) -> Option<BTreeSet<String>> {
        let inner = self.inner.read().expect("preference store lock poisoned");
        inner.get(user_id).cloned()
    }
}
