use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("tmdb.{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("tmdb.region must be a two-letter country code, got '{0}'")]
    InvalidRegion(String),

    #[error("tmdb.timeout_seconds must be greater than zero")]
    InvalidTimeout,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata service settings. Credentials live in `credentials.toml`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_logo_base_url")]
    pub logo_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Country used for watch-provider lookups
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Force JSON logs; otherwise they are JSON only when stdout is not a terminal
    #[serde(default)]
    pub json: bool,
    /// Rotated daily when set
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_logo_base_url() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            logo_base_url: default_logo_base_url(),
            language: default_language(),
            region: default_region(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it has never been written
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("base_url", &self.tmdb.base_url),
            ("image_base_url", &self.tmdb.image_base_url),
            ("logo_base_url", &self.tmdb.logo_base_url),
        ];
        for (field, value) in urls {
            if !is_http_url(value) {
                return Err(ConfigError::InvalidUrl { field, value: value.clone() });
            }
        }

        let region = &self.tmdb.region;
        if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidRegion(region.clone()));
        }

        if self.tmdb.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tmdb.region = "GB".to_string();
        config.logging.file = Some(PathBuf::from("/var/log/cinemate.log"));

        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.tmdb.region, "GB");
        assert_eq!(loaded.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(loaded.logging.file, Some(PathBuf::from("/var/log/cinemate.log")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[tmdb]\nlanguage = \"de-DE\"\n").unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.tmdb.language, "de-DE");
        assert_eq!(loaded.tmdb.region, "US");
        assert_eq!(loaded.tmdb.timeout_seconds, 10);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_saved_default_config_does_not_force_json_logs() {
        let file = NamedTempFile::new().unwrap();
        Config::default().save_to_file(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("json = false"));

        let loaded = Config::load_or_default(file.path()).unwrap();
        assert!(!loaded.logging.json);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded.tmdb.image_base_url, "https://image.tmdb.org/t/p/w500");
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.tmdb.region = "USA".to_string();
        assert_eq!(config.validate(), Err(ConfigError::InvalidRegion("USA".to_string())));

        config.tmdb.region = "us".to_string();
        config.tmdb.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { field: "base_url", .. })));

        config.tmdb.base_url = default_base_url();
        config.tmdb.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));
    }
}
