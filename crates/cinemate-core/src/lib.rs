pub mod activity_log;
pub mod error;
pub mod history_view;
pub mod library;
pub mod preferences;
pub mod recommend;
pub mod saved_list;
pub mod store;

pub use activity_log::{ActivityLog, HISTORY_KEY, MAX_HISTORY_ITEMS};
pub use error::StoreError;
pub use history_view::{date_heading, group_by_date, paginate, HistoryPage, HISTORY_PAGE_SIZE};
pub use library::Library;
pub use preferences::{PreferencesStore, PREFERENCES_KEY};
pub use recommend::{recommendations, resolve_genre, Recommendation};
pub use saved_list::{SavedIdList, ToggleOutcome, WATCHED_KEY, WATCHLIST_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
