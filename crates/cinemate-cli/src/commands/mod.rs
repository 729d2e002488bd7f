pub mod config;
pub mod history;
pub mod lists;
pub mod movies;
pub mod prefs;
pub mod progress;
pub mod prompts;

use crate::output::Output;
use cinemate_config::{Config, CredentialStore, PathManager};
use cinemate_core::{JsonFileStore, KeyValueStore, Library};
use cinemate_sources::TmdbClient;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;

/// Everything a command needs, built once per invocation
pub struct App {
    pub paths: PathManager,
    pub config: Config,
    pub library: Library,
    pub output: Output,
}

impl App {
    pub fn new(paths: PathManager, config: Config, output: Output) -> Result<Self> {
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories under {}: {}", paths.config_dir().display(), e))?;

        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::from_paths(&paths));
        tracing::debug!(data_dir = %paths.data_dir().display(), "Opened local store");

        Ok(Self {
            library: Library::new(store),
            paths,
            config,
            output,
        })
    }

    /// TMDB client from stored or environment credentials
    pub fn source(&self) -> Result<TmdbClient> {
        let credentials_file = self.paths.credentials_file();
        let mut cred_store = CredentialStore::new(credentials_file.clone());
        cred_store
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        Ok(TmdbClient::from_config(&self.config.tmdb, cred_store.tmdb_auth())?)
    }

    /// Like [`App::source`], but a missing or broken configuration is only a warning
    pub fn try_source(&self) -> Option<TmdbClient> {
        match self.source() {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!(error = %e, "TMDB unavailable");
                None
            }
        }
    }
}
