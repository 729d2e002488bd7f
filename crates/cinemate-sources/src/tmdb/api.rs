use cinemate_config::TmdbAuth;
use cinemate_models::{Credits, Genre, MovieDetails, MovieId, MovieSummary, WatchProviders};
use reqwest::{Client, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::SourceError;

const SERVICE: &str = "tmdb";

/// Everything a request needs besides the HTTP client
#[derive(Debug, Clone)]
pub struct ApiContext<'a> {
    pub base_url: &'a str,
    pub auth: &'a TmdbAuth,
    pub language: &'a str,
}

/// Parameters for `discover/movie`
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub genre_id: Option<u32>,
    pub sort_by: String,
    pub min_vote_count: Option<u32>,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            genre_id: None,
            sort_by: "vote_average.desc".to_string(),
            min_vote_count: None,
            page: 1,
        }
    }
}

impl DiscoverQuery {
    /// Best-rated movies of a genre, ignoring titles with too few votes to be meaningful
    pub fn for_genre(genre_id: u32) -> Self {
        Self {
            genre_id: Some(genre_id),
            min_vote_count: Some(100),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("sort_by", self.sort_by.clone())];
        if let Some(genre_id) = self.genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }
        if let Some(min) = self.min_vote_count {
            params.push(("vote_count.gte", min.to_string()));
        }
        params.push(("page", self.page.max(1).to_string()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Build an authorized GET request. Split from sending so the URL and
/// headers can be inspected without a network.
pub fn build_request(
    client: &Client,
    ctx: &ApiContext<'_>,
    path: &str,
    params: &[(&str, String)],
) -> Result<Request, SourceError> {
    let mut builder = client
        .get(endpoint_url(ctx.base_url, path))
        .header("Accept", "application/json")
        .query(&[("language", ctx.language)])
        .query(params);

    builder = match ctx.auth {
        TmdbAuth::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
        TmdbAuth::Bearer(token) => builder.bearer_auth(token),
    };

    Ok(builder.build()?)
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    ctx: &ApiContext<'_>,
    path: &str,
    params: &[(&str, String)],
) -> Result<T, SourceError> {
    let request = build_request(client, ctx, path, params)?;
    debug!(path = path, "TMDB request");

    let response = client.execute(request).await.map_err(|e| {
        error!(path = path, error = %e, "TMDB request could not be sent");
        SourceError::Http(e)
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!(path = path, status = status.as_u16(), "TMDB request failed");
        return Err(SourceError::from_status(SERVICE, status.as_u16(), &error_text));
    }

    let body = response.text().await.map_err(|e| {
        error!(path = path, error = %e, "Failed to read TMDB response body");
        SourceError::Http(e)
    })?;
    serde_json::from_str(&body).map_err(|e| SourceError::InvalidResponse {
        service: SERVICE.to_string(),
        message: format!("{} ({})", e, path),
    })
}

pub async fn search_movies(client: &Client, ctx: &ApiContext<'_>, query: &str) -> Result<Vec<MovieSummary>, SourceError> {
    let page: PagedResponse<MovieSummary> =
        get_json(client, ctx, "search/movie", &[("query", query.to_string())]).await?;
    Ok(page.results)
}

pub async fn movie_details(client: &Client, ctx: &ApiContext<'_>, id: MovieId) -> Result<MovieDetails, SourceError> {
    get_json(
        client,
        ctx,
        &format!("movie/{}", id),
        &[("append_to_response", "credits".to_string())],
    )
    .await
}

pub async fn movie_credits(client: &Client, ctx: &ApiContext<'_>, id: MovieId) -> Result<Credits, SourceError> {
    get_json(client, ctx, &format!("movie/{}/credits", id), &[]).await
}

pub async fn watch_providers(client: &Client, ctx: &ApiContext<'_>, id: MovieId) -> Result<WatchProviders, SourceError> {
    get_json(client, ctx, &format!("movie/{}/watch/providers", id), &[]).await
}

pub async fn genres(client: &Client, ctx: &ApiContext<'_>) -> Result<Vec<Genre>, SourceError> {
    let list: GenreListResponse = get_json(client, ctx, "genre/movie/list", &[]).await?;
    Ok(list.genres)
}

pub async fn discover(client: &Client, ctx: &ApiContext<'_>, query: &DiscoverQuery) -> Result<Vec<MovieSummary>, SourceError> {
    let page: PagedResponse<MovieSummary> = get_json(client, ctx, "discover/movie", &query.params()).await?;
    Ok(page.results)
}

/// `movie/popular`, `movie/top_rated` and friends
pub async fn movie_list(client: &Client, ctx: &ApiContext<'_>, list: &str) -> Result<Vec<MovieSummary>, SourceError> {
    let page: PagedResponse<MovieSummary> = get_json(client, ctx, &format!("movie/{}", list), &[]).await?;
    Ok(page.results)
}
