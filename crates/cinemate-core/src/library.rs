use cinemate_models::{HistoryAction, MovieId, NewHistoryEntry, Preferences};
use std::sync::Arc;
use tracing::warn;

use crate::activity_log::ActivityLog;
use crate::error::StoreError;
use crate::preferences::PreferencesStore;
use crate::saved_list::{SavedIdList, ToggleOutcome};
use crate::store::KeyValueStore;

/// All locally stored user state, built once at startup over a single store.
///
/// Tracking helpers never fail the surrounding operation: a log write error
/// is reported with `warn!` and otherwise ignored.
pub struct Library {
    activity: ActivityLog,
    watchlist: SavedIdList,
    watched: SavedIdList,
    preferences: PreferencesStore,
}

impl Library {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            activity: ActivityLog::new(store.clone()),
            watchlist: SavedIdList::watchlist(store.clone()),
            watched: SavedIdList::watched(store.clone()),
            preferences: PreferencesStore::new(store),
        }
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn watchlist(&self) -> &SavedIdList {
        &self.watchlist
    }

    pub fn watched(&self) -> &SavedIdList {
        &self.watched
    }

    /// Saved preferences, or the defaults
    pub fn preferences(&self) -> Result<Preferences, StoreError> {
        self.preferences.load()
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), StoreError> {
        self.preferences.save(preferences)
    }

    pub fn reset_preferences(&self) -> Result<(), StoreError> {
        self.preferences.reset()
    }

    pub fn toggle_watchlist(&self, id: MovieId, title: &str) -> Result<ToggleOutcome, StoreError> {
        let outcome = self.watchlist.toggle(id)?;
        let entry = match outcome {
            ToggleOutcome::Added => NewHistoryEntry::new(HistoryAction::WatchlistAdd, title)
                .with_details(format!("Added \"{}\" to watchlist", title)),
            ToggleOutcome::Removed => NewHistoryEntry::new(HistoryAction::WatchlistRemove, title)
                .with_details(format!("Removed \"{}\" from watchlist", title)),
        };
        self.track(entry.with_movie(id));
        Ok(outcome)
    }

    pub fn toggle_watched(&self, id: MovieId, title: &str) -> Result<ToggleOutcome, StoreError> {
        let outcome = self.watched.toggle(id)?;
        let entry = match outcome {
            ToggleOutcome::Added => NewHistoryEntry::new(HistoryAction::Watched, title)
                .with_details(format!("Marked \"{}\" as watched", title)),
            ToggleOutcome::Removed => NewHistoryEntry::new(HistoryAction::Unwatched, title)
                .with_details(format!("Unmarked \"{}\" as watched", title)),
        };
        self.track(entry.with_movie(id));
        Ok(outcome)
    }

    pub fn track_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.track(
            NewHistoryEntry::new(HistoryAction::Search, format!("Search: \"{}\"", query))
                .with_details(format!("Searched for \"{}\"", query)),
        );
    }

    pub fn track_details_view(&self, id: MovieId, title: &str) {
        self.track(
            NewHistoryEntry::new(HistoryAction::DetailsView, title)
                .with_movie(id)
                .with_details(format!("Viewed details for \"{}\"", title)),
        );
    }

    pub fn track_where_to_watch(&self, id: MovieId, title: &str) {
        self.track(
            NewHistoryEntry::new(HistoryAction::WhereToWatch, title)
                .with_movie(id)
                .with_details(format!("Checked where to watch \"{}\"", title)),
        );
    }

    pub fn track_page_view(&self, page: &str) {
        self.track(
            NewHistoryEntry::new(HistoryAction::PageView, format!("Visited {}", page))
                .with_details(format!("Viewed the {} page", page)),
        );
    }

    fn track(&self, entry: NewHistoryEntry) {
        let action = entry.action;
        if let Err(e) = self.activity.record(entry) {
            warn!(action = %action, error = %e, "Failed to record history entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn library() -> Library {
        Library::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_toggle_watchlist_records_add_and_remove() {
        let lib = library();

        assert_eq!(lib.toggle_watchlist(949, "Heat").unwrap(), ToggleOutcome::Added);
        assert_eq!(lib.toggle_watchlist(949, "Heat").unwrap(), ToggleOutcome::Removed);

        let log = lib.activity().list(None).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, HistoryAction::WatchlistRemove);
        assert_eq!(log[0].details.as_deref(), Some("Removed \"Heat\" from watchlist"));
        assert_eq!(log[1].action, HistoryAction::WatchlistAdd);
        assert_eq!(log[1].movie_id, Some(949));
        assert!(!lib.watchlist().contains(949).unwrap());
    }

    #[test]
    fn test_toggle_watched_uses_watched_set_only() {
        let lib = library();
        lib.toggle_watched(348, "Alien").unwrap();

        assert!(lib.watched().contains(348).unwrap());
        assert!(!lib.watchlist().contains(348).unwrap());

        let log = lib.activity().list(Some(HistoryAction::Watched)).unwrap();
        assert_eq!(log[0].details.as_deref(), Some("Marked \"Alien\" as watched"));

        lib.toggle_watched(348, "Alien").unwrap();
        let log = lib.activity().list(None).unwrap();
        assert_eq!(log[0].action, HistoryAction::Unwatched);
    }

    #[test]
    fn test_tracking_helpers() {
        let lib = library();
        lib.track_search("  blade runner ");
        lib.track_search("   ");
        lib.track_details_view(78, "Blade Runner");
        lib.track_where_to_watch(78, "Blade Runner");
        lib.track_page_view("For You");

        let log = lib.activity().list(None).unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0].title, "Visited For You");
        assert_eq!(log[0].details.as_deref(), Some("Viewed the For You page"));
        assert_eq!(log[0].movie_id, None);
        assert_eq!(log[1].action, HistoryAction::WhereToWatch);
        assert_eq!(log[2].details.as_deref(), Some("Viewed details for \"Blade Runner\""));
        assert_eq!(log[3].title, "Search: \"blade runner\"");
    }

    #[test]
    fn test_preferences_round_trip() {
        let lib = library();
        let prefs = Preferences {
            genre: "Drama".to_string(),
            ..Preferences::default()
        };
        lib.save_preferences(&prefs).unwrap();
        assert_eq!(lib.preferences().unwrap().genre, "Drama");

        lib.reset_preferences().unwrap();
        assert_eq!(lib.preferences().unwrap(), Preferences::default());
    }

    #[test]
    fn test_blank_title_still_toggles_without_logging() {
        let lib = library();
        assert_eq!(lib.toggle_watchlist(1, "").unwrap(), ToggleOutcome::Added);
        assert!(lib.activity().list(None).unwrap().is_empty());
    }

    /// Fails every write to the activity log key
    struct FailingLogStore(MemoryStore);

    impl KeyValueStore for FailingLogStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == crate::activity_log::HISTORY_KEY {
                return Err(StoreError::Poisoned);
            }
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_log_failure_does_not_fail_toggle() {
        let lib = Library::new(Arc::new(FailingLogStore(MemoryStore::new())));
        assert_eq!(lib.toggle_watchlist(5, "Five").unwrap(), ToggleOutcome::Added);
        assert!(lib.watchlist().contains(5).unwrap());
    }
}
