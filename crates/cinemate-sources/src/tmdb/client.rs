use async_trait::async_trait;
use cinemate_config::{TmdbAuth, TmdbConfig};
use cinemate_models::{Credits, Genre, MovieDetails, MovieId, MovieSummary, WatchProviders};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;
use crate::tmdb::api::{self, ApiContext, DiscoverQuery};
use crate::traits::MetadataSource;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    auth: TmdbAuth,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, auth: TmdbAuth) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("cinemate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        debug!(base_url = %config.base_url, "Created TMDB client");

        Ok(Self {
            client: Arc::new(client),
            auth,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Fails with a configuration error when no credentials were found
    pub fn from_config(config: &TmdbConfig, auth: Option<TmdbAuth>) -> Result<Self, SourceError> {
        let auth = auth.ok_or_else(|| {
            SourceError::NotConfigured(
                "TMDB (set TMDB_API_KEY or run `cinemate config tmdb --api-key <KEY>`)".to_string(),
            )
        })?;
        Self::new(config, auth)
    }

    fn ctx(&self) -> ApiContext<'_> {
        ApiContext {
            base_url: &self.base_url,
            auth: &self.auth,
            language: &self.language,
        }
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
        api::search_movies(&self.client, &self.ctx(), query).await
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails, SourceError> {
        api::movie_details(&self.client, &self.ctx(), id).await
    }

    async fn movie_credits(&self, id: MovieId) -> Result<Credits, SourceError> {
        api::movie_credits(&self.client, &self.ctx(), id).await
    }

    async fn watch_providers(&self, id: MovieId) -> Result<WatchProviders, SourceError> {
        api::watch_providers(&self.client, &self.ctx(), id).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, SourceError> {
        api::genres(&self.client, &self.ctx()).await
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<MovieSummary>, SourceError> {
        api::discover(&self.client, &self.ctx(), query).await
    }

    async fn popular(&self) -> Result<Vec<MovieSummary>, SourceError> {
        api::movie_list(&self.client, &self.ctx(), "popular").await
    }

    async fn top_rated(&self) -> Result<Vec<MovieSummary>, SourceError> {
        api::movie_list(&self.client, &self.ctx(), "top_rated").await
    }
}
