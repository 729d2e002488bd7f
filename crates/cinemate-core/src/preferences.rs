use cinemate_models::Preferences;
use std::sync::Arc;

use crate::error::StoreError;
use crate::store::{read_json, write_json, KeyValueStore};

pub const PREFERENCES_KEY: &str = "cinemate-preferences";

pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored preferences, or the defaults when none were saved
    pub fn load(&self) -> Result<Preferences, StoreError> {
        Ok(read_json(self.store.as_ref(), PREFERENCES_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), PREFERENCES_KEY, preferences)
    }

    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(PREFERENCES_KEY)
    }
}
