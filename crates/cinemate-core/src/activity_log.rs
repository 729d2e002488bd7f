use chrono::{DateTime, Utc};
use cinemate_models::{HistoryAction, HistoryEntry, NewHistoryEntry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{read_json, write_json, KeyValueStore};

pub const HISTORY_KEY: &str = "cinemate-history";

pub const MAX_HISTORY_ITEMS: usize = 50;

/// Most-recent-first log of user actions, capped at [`MAX_HISTORY_ITEMS`].
///
/// Stored as one JSON array under [`HISTORY_KEY`]. Not to be confused with
/// the watched set, which lives under the `history` key.
pub struct ActivityLog {
    store: Arc<dyn KeyValueStore>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record an entry. Entries without a title are dropped and `None` is returned.
    pub fn record(&self, entry: NewHistoryEntry) -> Result<Option<HistoryEntry>, StoreError> {
        self.record_at(entry, Utc::now())
    }

    pub fn record_at(&self, entry: NewHistoryEntry, now: DateTime<Utc>) -> Result<Option<HistoryEntry>, StoreError> {
        if !entry.is_valid() {
            debug!(action = %entry.action, "Ignoring history entry without a title");
            return Ok(None);
        }

        let entry = entry.into_entry(now);
        let (mut entries, skipped) = self.load()?;
        if skipped > 0 {
            self.backup_before_rewrite()?;
        }
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY_ITEMS);
        write_json(self.store.as_ref(), HISTORY_KEY, &entries)?;

        debug!(action = %entry.action, title = %entry.title, "Recorded history entry");
        Ok(Some(entry))
    }

    /// Stored entries, newest first, optionally restricted to one action
    pub fn list(&self, filter: Option<HistoryAction>) -> Result<Vec<HistoryEntry>, StoreError> {
        let (entries, _) = self.load()?;
        Ok(match filter {
            Some(action) => entries.into_iter().filter(|e| e.action == action).collect(),
            None => entries,
        })
    }

    /// Irreversible; callers must confirm with the user first
    pub fn clear(&self) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), HISTORY_KEY, &Vec::<HistoryEntry>::new())
    }

    /// Entries are decoded one by one so a single malformed record (e.g.
    /// missing action or title) is skipped rather than discarding the log.
    /// Returns the readable entries and how many were skipped.
    fn load(&self) -> Result<(Vec<HistoryEntry>, usize), StoreError> {
        let raw: Vec<Value> = read_json(self.store.as_ref(), HISTORY_KEY)?.unwrap_or_default();
        let total = raw.len();

        let entries: Vec<HistoryEntry> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value::<HistoryEntry>(value).ok())
            .filter(|entry| !entry.title.trim().is_empty())
            .collect();

        let skipped = total - entries.len();
        if skipped > 0 {
            warn!(skipped = skipped, "Skipped malformed history entries");
        }

        Ok((entries, skipped))
    }

    /// Copy the stored log to `<key>.bak` before a write drops unreadable entries
    fn backup_before_rewrite(&self) -> Result<(), StoreError> {
        if let Some(raw) = self.store.get(HISTORY_KEY)? {
            warn!(key = HISTORY_KEY, "Backing up history before dropping malformed entries");
            self.store.quarantine(HISTORY_KEY, &raw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn log() -> (Arc<MemoryStore>, ActivityLog) {
        let store = Arc::new(MemoryStore::new());
        let log = ActivityLog::new(store.clone());
        (store, log)
    }

    #[test]
    fn test_record_then_list_returns_entry_first_with_timestamp() {
        let (_, log) = log();
        log.record(NewHistoryEntry::new(HistoryAction::Search, "Search: \"heat\"")).unwrap();

        let entry = NewHistoryEntry::new(HistoryAction::DetailsView, "Heat")
            .with_movie(949)
            .with_details("Viewed details for \"Heat\"");
        let before = Utc::now();
        log.record(entry).unwrap();

        let entries = log.list(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Heat");
        assert_eq!(entries[0].movie_id, Some(949));
        assert!(entries[0].timestamp >= before);
        assert_eq!(entries[1].action, HistoryAction::Search);
    }

    #[test]
    fn test_log_is_capped_and_drops_oldest() {
        let (_, log) = log();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        for i in 0..51 {
            let entry = NewHistoryEntry::new(HistoryAction::PageView, format!("Visit {}", i));
            log.record_at(entry, start + Duration::minutes(i)).unwrap();
        }

        let entries = log.list(None).unwrap();
        assert_eq!(entries.len(), MAX_HISTORY_ITEMS);
        assert_eq!(entries[0].title, "Visit 50");
        assert_eq!(entries[49].title, "Visit 1");
        assert!(entries.iter().all(|e| e.title != "Visit 0"));
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let (store, log) = log();
        let recorded = log.record(NewHistoryEntry::new(HistoryAction::Search, "")).unwrap();
        assert!(recorded.is_none());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_filter_keeps_relative_order() {
        let (_, log) = log();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let actions = [
            (HistoryAction::Watched, "A"),
            (HistoryAction::Search, "B"),
            (HistoryAction::Watched, "C"),
            (HistoryAction::Unwatched, "D"),
            (HistoryAction::Watched, "E"),
        ];
        for (i, (action, title)) in actions.iter().enumerate() {
            log.record_at(NewHistoryEntry::new(*action, *title), start + Duration::seconds(i as i64)).unwrap();
        }

        let watched: Vec<String> = log
            .list(Some(HistoryAction::Watched))
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(watched, vec!["E", "C", "A"]);
    }

    #[test]
    fn test_clear_empties_log() {
        let (store, log) = log();
        log.record(NewHistoryEntry::new(HistoryAction::Search, "x")).unwrap();
        log.clear().unwrap();
        assert!(log.list(None).unwrap().is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_explicit_timestamp_is_preserved() {
        let (_, log) = log();
        let ts = Utc.with_ymd_and_hms(2020, 2, 2, 2, 2, 2).unwrap();
        log.record(NewHistoryEntry::new(HistoryAction::Search, "old").at(ts)).unwrap();
        assert_eq!(log.list(None).unwrap()[0].timestamp, ts);
    }

    #[test]
    fn test_malformed_stored_entries_are_skipped() {
        let (store, log) = log();
        store
            .set(
                HISTORY_KEY,
                r#"[
                    {"action":"watched","title":"Alien","movieId":348,"timestamp":"2025-04-16T10:00:00.000Z"},
                    {"title":"no action","timestamp":"2025-04-16T09:00:00.000Z"},
                    {"action":"search","title":"","timestamp":"2025-04-16T08:00:00.000Z"}
                ]"#,
            )
            .unwrap();

        let entries = log.list(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].movie_id, Some(348));
    }

    #[test]
    fn test_string_movie_ids_survive_a_write() {
        let (store, log) = log();
        store
            .set(
                HISTORY_KEY,
                r#"[{"action":"details_view","title":"Movie Details","movieId":"550","timestamp":"2025-04-16T10:00:00.000Z"}]"#,
            )
            .unwrap();

        log.record(NewHistoryEntry::new(HistoryAction::Search, "x")).unwrap();

        let entries = log.list(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].movie_id, Some(550));
        assert_eq!(store.get(&format!("{}.bak", HISTORY_KEY)).unwrap(), None);
    }

    #[test]
    fn test_record_backs_up_log_before_dropping_unreadable_entries() {
        let (store, log) = log();
        let raw = r#"[{"action":"teleport","title":"Odd","timestamp":"2025-04-16T10:00:00.000Z"},{"action":"watched","title":"Alien","timestamp":"2025-04-16T09:00:00.000Z"}]"#;
        store.set(HISTORY_KEY, raw).unwrap();

        log.record(NewHistoryEntry::new(HistoryAction::Search, "x")).unwrap();

        assert_eq!(store.get(&format!("{}.bak", HISTORY_KEY)).unwrap().as_deref(), Some(raw));
        let titles: Vec<String> = log.list(None).unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["x", "Alien"]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let (_, log) = log();
        assert!(log.list(None).unwrap().is_empty());
        assert!(log.list(Some(HistoryAction::Search)).unwrap().is_empty());
    }
}
