use serde::{Deserialize, Serialize};

/// Genre filter value meaning "no genre restriction"
pub const ALL_GENRES: &str = "All";

/// Recommendation filters, stored as a single record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default)]
    pub min_rating: f64,
    #[serde(default = "default_from_year")]
    pub from_year: i32,
    #[serde(default = "default_to_year")]
    pub to_year: i32,
}

fn default_genre() -> String {
    ALL_GENRES.to_string()
}

fn default_from_year() -> i32 {
    1900
}

fn default_to_year() -> i32 {
    2100
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            genre: default_genre(),
            min_rating: 0.0,
            from_year: default_from_year(),
            to_year: default_to_year(),
        }
    }
}

impl Preferences {
    pub fn any_genre(&self) -> bool {
        self.genre.eq_ignore_ascii_case(ALL_GENRES)
    }

    /// Whether a movie passes every filter. Movies without a known year are
    /// never excluded by the year range.
    pub fn matches(&self, genre_names: &[String], vote_average: f64, year: Option<i32>) -> bool {
        if !self.any_genre() && !genre_names.iter().any(|g| g.eq_ignore_ascii_case(&self.genre)) {
            return false;
        }

        if vote_average < self.min_rating {
            return false;
        }

        if let Some(year) = year {
            if year < self.from_year || year > self.to_year {
                return false;
            }
        }

        true
    }
}
