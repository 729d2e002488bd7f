use serde::{Deserialize, Serialize};

use crate::credits::Credits;

/// TMDB movie identifier
pub type MovieId = u64;

/// Shown in place of a poster when TMDB has none
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// Shown for any missing year, rating or runtime
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Movie as returned by TMDB list endpoints (search, discover, popular...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Full movie record from `movie/{id}`, optionally with credits appended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Year prefix of a TMDB `YYYY-MM-DD` date. TMDB sends `""` for unknown dates.
pub fn release_year(release_date: Option<&str>) -> Option<i32> {
    release_date
        .filter(|d| d.len() >= 4)
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
}

fn year_label(release_date: Option<&str>) -> String {
    release_year(release_date)
        .map(|y| y.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Zero counts as unrated
fn rating_label(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{:.1}", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn poster_url(poster_path: Option<&str>, image_base: &str) -> String {
    match poster_path {
        Some(path) if !path.is_empty() => format!("{}{}", image_base.trim_end_matches('/'), path),
        _ => PLACEHOLDER_POSTER.to_string(),
    }
}

impl MovieSummary {
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    pub fn year_label(&self) -> String {
        year_label(self.release_date.as_deref())
    }

    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }

    pub fn poster_url(&self, image_base: &str) -> String {
        poster_url(self.poster_path.as_deref(), image_base)
    }

    /// Display title; TMDB occasionally returns entries without one
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Unknown"
        } else {
            &self.title
        }
    }
}

impl MovieDetails {
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    pub fn year_label(&self) -> String {
        year_label(self.release_date.as_deref())
    }

    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }

    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(minutes) if minutes > 0 => format!("{} min", minutes),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn genres_label(&self) -> String {
        if self.genres.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ")
        }
    }

    pub fn poster_url(&self, image_base: &str) -> String {
        poster_url(self.poster_path.as_deref(), image_base)
    }

    /// Reduce to the list-endpoint shape, e.g. for history tracking
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average,
            vote_count: None,
            overview: self.overview.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(release_date: Option<&str>, vote_average: Option<f64>, poster: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 1,
            title: "Alien".to_string(),
            release_date: release_date.map(String::from),
            poster_path: poster.map(String::from),
            vote_average,
            vote_count: None,
            overview: None,
            genre_ids: vec![],
        }
    }

    #[test]
    fn test_missing_fields_fall_back_to_placeholders() {
        let movie = summary(Some(""), Some(0.0), None);
        assert_eq!(movie.year(), None);
        assert_eq!(movie.year_label(), "N/A");
        assert_eq!(movie.rating_label(), "N/A");
        assert_eq!(movie.poster_url("https://image.tmdb.org/t/p/w500"), PLACEHOLDER_POSTER);
    }

    #[test]
    fn test_present_fields_are_formatted() {
        let movie = summary(Some("1979-05-25"), Some(8.149), Some("/vfrQk5IPloGg1v9Rzbh2Eg3VGyM.jpg"));
        assert_eq!(movie.year(), Some(1979));
        assert_eq!(movie.rating_label(), "8.1");
        assert_eq!(
            movie.poster_url("https://image.tmdb.org/t/p/w500/"),
            "https://image.tmdb.org/t/p/w500/vfrQk5IPloGg1v9Rzbh2Eg3VGyM.jpg"
        );
    }

    #[test]
    fn test_summary_tolerates_sparse_json() {
        let movie: MovieSummary = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(movie.id, 42);
        assert_eq!(movie.display_title(), "Unknown");
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_details_labels() {
        let details: MovieDetails = serde_json::from_str(
            r#"{"id": 949, "title": "Heat", "runtime": 170, "release_date": "1995-12-15",
                "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}]}"#,
        )
        .unwrap();
        assert_eq!(details.runtime_label(), "170 min");
        assert_eq!(details.genres_label(), "Action, Crime");
        assert_eq!(details.summary().genre_ids, vec![28, 80]);

        let bare: MovieDetails = serde_json::from_str(r#"{"id": 1, "runtime": 0}"#).unwrap();
        assert_eq!(bare.runtime_label(), "N/A");
        assert_eq!(bare.genres_label(), "N/A");
    }
}
