use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const TMDB_API_KEY: &str = "tmdb_api_key";
const TMDB_BEARER_TOKEN: &str = "tmdb_bearer_token";

/// How requests to TMDB are authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdbAuth {
    /// v3 key sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read access token sent as `Authorization: Bearer`
    Bearer(String),
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get(TMDB_API_KEY)
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set(TMDB_API_KEY.to_string(), key);
    }

    pub fn get_tmdb_bearer_token(&self) -> Option<&String> {
        self.get(TMDB_BEARER_TOKEN)
    }

    pub fn set_tmdb_bearer_token(&mut self, token: String) {
        self.set(TMDB_BEARER_TOKEN.to_string(), token);
    }

    /// Resolve TMDB auth. `TMDB_BEARER_TOKEN` / `TMDB_API_KEY` in the
    /// environment win over stored values; a bearer token wins over an API key.
    pub fn tmdb_auth(&self) -> Option<TmdbAuth> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        self.tmdb_auth_with(env("TMDB_BEARER_TOKEN"), env("TMDB_API_KEY"))
    }

    fn tmdb_auth_with(&self, env_bearer: Option<String>, env_key: Option<String>) -> Option<TmdbAuth> {
        let stored = |v: Option<&String>| v.filter(|s| !s.trim().is_empty()).cloned();

        env_bearer
            .or_else(|| stored(self.get_tmdb_bearer_token()))
            .map(TmdbAuth::Bearer)
            .or_else(|| {
                env_key
                    .or_else(|| stored(self.get_tmdb_api_key()))
                    .map(TmdbAuth::ApiKey)
            })
    }
}
