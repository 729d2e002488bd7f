use cinemate_models::MovieId;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{read_json, write_json, KeyValueStore};

pub const WATCHLIST_KEY: &str = "watchlist";

/// The watched set. Shares a name with the activity log but is unrelated to it.
pub const WATCHED_KEY: &str = "history";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleOutcome::Added => f.write_str("added"),
            ToggleOutcome::Removed => f.write_str("removed"),
        }
    }
}

/// Set of movie ids persisted as a JSON array under a single key
pub struct SavedIdList {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SavedIdList {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn watchlist(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, WATCHLIST_KEY)
    }

    pub fn watched(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, WATCHED_KEY)
    }

    /// Stored ids in insertion order
    pub fn ids(&self) -> Result<Vec<MovieId>, StoreError> {
        let raw: Vec<Value> = read_json(self.store.as_ref(), &self.key)?.unwrap_or_default();

        // Older writers stored ids as numeric strings
        let mut ids: Vec<MovieId> = Vec::with_capacity(raw.len());
        for value in raw {
            let id = match &value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            if let Some(id) = id {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    pub fn contains(&self, id: MovieId) -> Result<bool, StoreError> {
        Ok(self.ids()?.contains(&id))
    }

    /// Remove `id` if present, append it otherwise
    pub fn toggle(&self, id: MovieId) -> Result<ToggleOutcome, StoreError> {
        let mut ids = self.ids()?;

        let outcome = if ids.contains(&id) {
            ids.retain(|existing| *existing != id);
            ToggleOutcome::Removed
        } else {
            ids.push(id);
            ToggleOutcome::Added
        };

        write_json(self.store.as_ref(), &self.key, &ids)?;
        debug!(key = %self.key, id = id, outcome = %outcome, "Toggled saved id");
        Ok(outcome)
    }
}
