//! "For You" recommendations built from several TMDB lists.

use cinemate_models::{Genre, MovieSummary, Preferences};
use cinemate_sources::{DiscoverQuery, MetadataSource, SourceError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub genres: Vec<String>,
    pub year: Option<i32>,
}

/// Fetch genres, popular, top-rated and best-rated titles concurrently, then
/// merge and filter them against the user's preferences. Any failed fetch
/// fails the whole result.
pub async fn recommendations(source: &dyn MetadataSource, prefs: &Preferences) -> Result<Vec<Recommendation>, SourceError> {
    let discover = DiscoverQuery::default();
    let result = futures::try_join!(source.genres(), source.popular(), source.top_rated(), source.discover(&discover));

    let (genres, popular, top_rated, best_rated) = match result {
        Ok(lists) => lists,
        Err(e) => {
            error!(source = source.source_name(), error = %e, "Failed to load recommendations");
            return Err(e);
        }
    };

    let merged = merge_unique([popular, top_rated, best_rated]);
    let candidates = merged.len();
    let picks: Vec<Recommendation> = annotate(merged, &genres)
        .into_iter()
        .filter(|r| prefs.matches(&r.genres, r.movie.vote_average.unwrap_or(0.0), r.year))
        .collect();

    debug!(candidates, kept = picks.len(), "Filtered recommendations");
    Ok(picks)
}

/// Concatenate lists in order, keeping the first occurrence of each id
fn merge_unique<I>(lists: I) -> Vec<MovieSummary>
where
    I: IntoIterator<Item = Vec<MovieSummary>>,
{
    let mut seen = HashSet::new();
    lists.into_iter().flatten().filter(|m| seen.insert(m.id)).collect()
}

fn annotate(movies: Vec<MovieSummary>, genres: &[Genre]) -> Vec<Recommendation> {
    let names: HashMap<u32, &str> = genres.iter().map(|g| (g.id, g.name.as_str())).collect();

    movies
        .into_iter()
        .map(|movie| {
            let genres = movie
                .genre_ids
                .iter()
                .filter_map(|id| names.get(id).map(|n| n.to_string()))
                .collect();
            let year = movie.year();
            Recommendation { movie, genres, year }
        })
        .collect()
}

/// Look up a genre by numeric id or case-insensitive name
pub fn resolve_genre<'a>(genres: &'a [Genre], name_or_id: &str) -> Option<&'a Genre> {
    let needle = name_or_id.trim();
    if let Ok(id) = needle.parse::<u32>() {
        return genres.iter().find(|g| g.id == id);
    }
    genres.iter().find(|g| g.name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cinemate_models::{Credits, MovieDetails, MovieId, WatchProviders};

    fn movie(id: MovieId, title: &str, date: &str, rating: f64, genre_ids: &[u32]) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: Some(date.to_string()),
            poster_path: None,
            vote_average: Some(rating),
            vote_count: Some(1000),
            overview: None,
            genre_ids: genre_ids.to_vec(),
        }
    }

    fn genres() -> Vec<Genre> {
        vec![
            Genre { id: 28, name: "Action".into() },
            Genre { id: 18, name: "Drama".into() },
            Genre { id: 878, name: "Science Fiction".into() },
        ]
    }

    struct FakeSource {
        fail_top_rated: bool,
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        fn source_name(&self) -> &str {
            "fake"
        }

        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieSummary>, SourceError> {
            Ok(Vec::new())
        }

        async fn movie_details(&self, _id: MovieId) -> Result<MovieDetails, SourceError> {
            Err(SourceError::NotConfigured("fake".into()))
        }

        async fn movie_credits(&self, _id: MovieId) -> Result<Credits, SourceError> {
            Ok(Credits::default())
        }

        async fn watch_providers(&self, _id: MovieId) -> Result<WatchProviders, SourceError> {
            Err(SourceError::NotConfigured("fake".into()))
        }

        async fn genres(&self) -> Result<Vec<Genre>, SourceError> {
            Ok(genres())
        }

        async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<MovieSummary>, SourceError> {
            assert_eq!(query.sort_by, "vote_average.desc");
            Ok(vec![movie(3, "Old Drama", "1950-01-01", 8.5, &[18]), movie(1, "Dup", "2001-01-01", 1.0, &[])])
        }

        async fn popular(&self) -> Result<Vec<MovieSummary>, SourceError> {
            Ok(vec![movie(1, "Blast", "2019-06-01", 6.5, &[28]), movie(2, "Stars", "2015-03-01", 7.9, &[878, 18])])
        }

        async fn top_rated(&self) -> Result<Vec<MovieSummary>, SourceError> {
            if self.fail_top_rated {
                return Err(SourceError::Status {
                    service: "fake".into(),
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(vec![movie(2, "Stars again", "2015-03-01", 7.9, &[878])])
        }
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let merged = merge_unique([
            vec![movie(1, "a", "2000-01-01", 5.0, &[])],
            vec![movie(2, "b", "2000-01-01", 5.0, &[]), movie(1, "c", "2000-01-01", 5.0, &[])],
        ]);
        let titles: Vec<_> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_annotate_ignores_unknown_genre_ids() {
        let out = annotate(vec![movie(1, "x", "1999-12-31", 5.0, &[28, 9999])], &genres());
        assert_eq!(out[0].genres, vec!["Action".to_string()]);
        assert_eq!(out[0].year, Some(1999));
    }

    #[test]
    fn test_resolve_genre() {
        let genres = genres();
        assert_eq!(resolve_genre(&genres, "drama").map(|g| g.id), Some(18));
        assert_eq!(resolve_genre(&genres, " 878 ").map(|g| g.name.as_str()), Some("Science Fiction"));
        assert!(resolve_genre(&genres, "Western").is_none());
        assert!(resolve_genre(&genres, "12").is_none());
    }

    #[tokio::test]
    async fn test_recommendations_default_preferences() {
        let source = FakeSource { fail_top_rated: false };
        let recs = recommendations(&source, &Preferences::default()).await.unwrap();

        let ids: Vec<_> = recs.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(recs[0].movie.title, "Blast");
        assert_eq!(recs[1].genres, vec!["Science Fiction".to_string(), "Drama".to_string()]);
    }

    #[tokio::test]
    async fn test_recommendations_apply_filters() {
        let source = FakeSource { fail_top_rated: false };
        let prefs = Preferences {
            genre: "drama".into(),
            min_rating: 7.0,
            from_year: 2000,
            to_year: 2100,
        };
        let recs = recommendations(&source, &prefs).await.unwrap();
        let ids: Vec<_> = recs.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_any_failure_fails_everything() {
        let source = FakeSource { fail_top_rated: true };
        let err = recommendations(&source, &Preferences::default()).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 500, .. }));
    }
}
