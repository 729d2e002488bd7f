pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, LoggingConfig, TmdbConfig};
pub use credentials::{CredentialStore, TmdbAuth};
pub use paths::{PathManager, base_path_override};
