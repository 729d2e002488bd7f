use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::movie::MovieId;

/// Kinds of user activity recorded in the activity log.
///
/// Serialized as the snake_case names used by the stored log
/// (`watchlist_add`, `details_view`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Search,
    WatchlistAdd,
    WatchlistRemove,
    Watched,
    Unwatched,
    DetailsView,
    WhereToWatch,
    PageView,
}

impl HistoryAction {
    pub const ALL: [HistoryAction; 8] = [
        HistoryAction::Search,
        HistoryAction::WatchlistAdd,
        HistoryAction::WatchlistRemove,
        HistoryAction::Watched,
        HistoryAction::Unwatched,
        HistoryAction::DetailsView,
        HistoryAction::WhereToWatch,
        HistoryAction::PageView,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Search => "search",
            HistoryAction::WatchlistAdd => "watchlist_add",
            HistoryAction::WatchlistRemove => "watchlist_remove",
            HistoryAction::Watched => "watched",
            HistoryAction::Unwatched => "unwatched",
            HistoryAction::DetailsView => "details_view",
            HistoryAction::WhereToWatch => "where_to_watch",
            HistoryAction::PageView => "page_view",
        }
    }

    /// Human-readable label shown next to each log entry
    pub fn label(&self) -> &'static str {
        match self {
            HistoryAction::Search => "Search",
            HistoryAction::WatchlistAdd => "Added to Watchlist",
            HistoryAction::WatchlistRemove => "Removed from Watchlist",
            HistoryAction::Watched => "Marked as Watched",
            HistoryAction::Unwatched => "Marked as Unwatched",
            HistoryAction::DetailsView => "Viewed Details",
            HistoryAction::WhereToWatch => "Checked Where to Watch",
            HistoryAction::PageView => "Visited Page",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            HistoryAction::Search => "🔍",
            HistoryAction::WatchlistAdd => "➕",
            HistoryAction::WatchlistRemove => "➖",
            HistoryAction::Watched => "✓",
            HistoryAction::Unwatched => "✗",
            HistoryAction::DetailsView => "👁️",
            HistoryAction::WhereToWatch => "🎬",
            HistoryAction::PageView => "•",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(pub String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = HistoryAction::ALL.iter().map(|a| a.as_str()).collect();
        write!(f, "unknown action '{}' (expected one of: {})", self.0, valid.join(", "))
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for HistoryAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        HistoryAction::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// A stored activity log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub title: String,
    /// Only present for movie-related actions
    #[serde(default, deserialize_with = "lenient_movie_id", skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<MovieId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMovieId {
    Number(MovieId),
    Text(String),
}

/// Older writers stored ids as numeric strings; accept both
fn lenient_movie_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MovieId>, D::Error> {
    match Option::<StoredMovieId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StoredMovieId::Number(id)) => Ok(Some(id)),
        Some(StoredMovieId::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid movie id '{}'", text)))
        }
    }
}

/// An entry about to be recorded. The timestamp is filled in at insertion
/// time when the caller leaves it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub action: HistoryAction,
    pub title: String,
    pub movie_id: Option<MovieId>,
    pub details: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewHistoryEntry {
    pub fn new(action: HistoryAction, title: impl Into<String>) -> Self {
        Self {
            action,
            title: title.into(),
            movie_id: None,
            details: None,
            timestamp: None,
        }
    }

    pub fn with_movie(mut self, movie_id: MovieId) -> Self {
        self.movie_id = Some(movie_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// A blank title counts as missing
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn into_entry(self, now: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry {
            action: self.action,
            title: self.title,
            movie_id: self.movie_id,
            details: self.details,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}
