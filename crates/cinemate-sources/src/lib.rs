pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use tmdb::{DiscoverQuery, TmdbClient};
pub use traits::{MetadataSource, MAX_SUGGESTIONS, MIN_SUGGEST_QUERY_LEN};
