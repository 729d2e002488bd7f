pub mod credits;
pub mod history;
pub mod movie;
pub mod preferences;
pub mod providers;

pub use credits::{CastMember, Credits, CrewMember};
pub use history::{HistoryAction, HistoryEntry, NewHistoryEntry, ParseActionError};
pub use movie::{Genre, MovieDetails, MovieId, MovieSummary, PLACEHOLDER_POSTER, NOT_AVAILABLE};
pub use preferences::{Preferences, ALL_GENRES};
pub use providers::{Provider, RegionProviders, WatchProviders, DEFAULT_REGION};
