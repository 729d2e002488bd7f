use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of the first `limit` billed cast members (TMDB returns them in billing order)
    pub fn top_cast(&self, limit: usize) -> Vec<&str> {
        self.cast.iter().take(limit).map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directors_and_top_cast() {
        let credits: Credits = serde_json::from_str(
            r#"{
                "cast": [
                    {"name": "Al Pacino", "character": "Hanna", "order": 0},
                    {"name": "Robert De Niro", "order": 1},
                    {"name": "Val Kilmer", "order": 2}
                ],
                "crew": [
                    {"name": "Michael Mann", "job": "Director", "department": "Directing"},
                    {"name": "Dante Spinotti", "job": "Director of Photography"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(credits.directors(), vec!["Michael Mann"]);
        assert_eq!(credits.top_cast(2), vec!["Al Pacino", "Robert De Niro"]);
        assert_eq!(credits.top_cast(5).len(), 3);
    }
}
