use async_trait::async_trait;
use cinemate_models::{Credits, Genre, MovieDetails, MovieId, MovieSummary, WatchProviders};
use tracing::warn;

use crate::error::SourceError;
use crate::tmdb::DiscoverQuery;

/// Queries shorter than this get no suggestions
pub const MIN_SUGGEST_QUERY_LEN: usize = 2;

pub const MAX_SUGGESTIONS: usize = 8;

/// Read-only movie metadata service
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError>;

    /// Title autocomplete built on search
    async fn suggest(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_LEN {
            return Ok(Vec::new());
        }

        let mut results = self.search_movies(query).await?;
        results.truncate(MAX_SUGGESTIONS);
        Ok(results)
    }

    /// Movie details with credits appended when the service supports it
    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, SourceError>;
    async fn movie_credits(&self, id: MovieId) -> Result<Credits, SourceError>;

    /// Details with credits fetched separately when the details response has none.
    /// A failed credits lookup leaves `credits` as `None`.
    async fn movie_details_with_credits(&self, id: MovieId) -> Result<MovieDetails, SourceError> {
        let mut movie = self.movie_details(id).await?;
        if movie.credits.is_none() {
            match self.movie_credits(id).await {
                Ok(credits) => movie.credits = Some(credits),
                Err(e) => warn!(movie_id = id, error = %e, "Failed to load credits"),
            }
        }
        Ok(movie)
    }

    async fn watch_providers(&self, id: MovieId) -> Result<WatchProviders, SourceError>;

    async fn genres(&self) -> Result<Vec<Genre>, SourceError>;
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<MovieSummary>, SourceError>;
    async fn popular(&self) -> Result<Vec<MovieSummary>, SourceError>;
    async fn top_rated(&self) -> Result<Vec<MovieSummary>, SourceError>;
}
