use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Status {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    #[error("{0} is not configured")]
    NotConfigured(String),
}

/// Error body TMDB sends with non-success statuses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

impl SourceError {
    /// Build a status error, preferring TMDB's `status_message` over the raw body
    pub fn from_status(service: &str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<TmdbErrorBody>(body)
            .ok()
            .and_then(|b| b.status_message)
            .unwrap_or_else(|| body.trim().to_string());

        SourceError::Status {
            service: service.to_string(),
            status,
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Status { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SourceError::Status { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_tmdb_message() {
        let body = r#"{"success":false,"status_code":7,"status_message":"Invalid API key: You must be granted a valid key."}"#;
        let err = SourceError::from_status("tmdb", 401, body);
        assert!(err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            "tmdb returned 401: Invalid API key: You must be granted a valid key."
        );
    }

    #[test]
    fn test_from_status_falls_back_to_body() {
        let err = SourceError::from_status("tmdb", 404, "  not here \n");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "tmdb returned 404: not here");
    }
}
