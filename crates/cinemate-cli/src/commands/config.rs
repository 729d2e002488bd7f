use super::progress::is_interactive;
use super::{prompts, App};
use crate::output::{new_table, section_header};
use cinemate_config::{Config, CredentialStore, TmdbAuth};
use cinemate_sources::{MetadataSource, TmdbClient};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub fn run_show(app: &App, full: bool) -> Result<()> {
    let config_file = app.paths.config_file();
    let credentials_file = app.paths.credentials_file();
    let cred_store = load_credentials(app)?;
    let config = &app.config;

    let api_key = display_secret(cred_store.get_tmdb_api_key(), full);
    let bearer = display_secret(cred_store.get_tmdb_bearer_token(), full);
    let auth_source = match cred_store.tmdb_auth() {
        Some(TmdbAuth::Bearer(_)) => "bearer token",
        Some(TmdbAuth::ApiKey(_)) => "api key",
        None => "not configured",
    };

    if !app.output.is_human() {
        app.output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "credentials_file": credentials_file.display().to_string(),
            "tmdb": {
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "logo_base_url": config.tmdb.logo_base_url,
                "language": config.tmdb.language,
                "region": config.tmdb.region,
                "timeout_seconds": config.tmdb.timeout_seconds,
                "api_key": api_key,
                "bearer_token": bearer,
                "auth": auth_source,
            },
            "logging": {
                "level": config.logging.level,
                "json": config.logging.json,
                "file": config.logging.file.as_ref().map(|p| p.display().to_string()),
            },
        }));
        return Ok(());
    }

    section_header("Configuration", &app.output);
    if !config_file.exists() {
        app.output.info(format!("No config file at {}; using defaults", config_file.display()));
    }

    let mut tmdb_table = new_table(["TMDB", ""]);
    tmdb_table.add_row(vec!["Base URL".to_string(), config.tmdb.base_url.clone()]);
    tmdb_table.add_row(vec!["Image base URL".to_string(), config.tmdb.image_base_url.clone()]);
    tmdb_table.add_row(vec!["Logo base URL".to_string(), config.tmdb.logo_base_url.clone()]);
    tmdb_table.add_row(vec!["Language".to_string(), config.tmdb.language.clone()]);
    tmdb_table.add_row(vec!["Region".to_string(), config.tmdb.region.clone()]);
    tmdb_table.add_row(vec!["Timeout".to_string(), format!("{}s", config.tmdb.timeout_seconds)]);
    tmdb_table.add_row(vec!["API key".to_string(), api_key]);
    tmdb_table.add_row(vec!["Bearer token".to_string(), bearer]);
    tmdb_table.add_row(vec!["Using".to_string(), auth_source.to_string()]);
    app.output.table(&tmdb_table);

    let mut logging_table = new_table(["Logging", ""]);
    logging_table.add_row(vec!["Level".to_string(), config.logging.level.clone()]);
    logging_table.add_row(vec!["JSON".to_string(), config.logging.json.to_string()]);
    logging_table.add_row(vec![
        "File".to_string(),
        config
            .logging
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stderr".to_string()),
    ]);
    app.output.table(&logging_table);
    Ok(())
}

pub async fn run_tmdb(app: &App, api_key: Option<String>, bearer_token: Option<String>) -> Result<()> {
    let (api_key, bearer_token) = if api_key.is_none() && bearer_token.is_none() {
        if !is_interactive() {
            return Err(eyre!("Pass --api-key or --bearer-token (no terminal to prompt on)"));
        }
        app.output.println("Create an API key at https://www.themoviedb.org/settings/api");
        app.output.println("Leave a field empty to keep its current value.");
        let key = prompts::prompt_secret("TMDB API key")?;
        let token = prompts::prompt_secret("TMDB read access token (optional)")?;
        (non_empty(key), non_empty(token))
    } else {
        (api_key.and_then(non_empty), bearer_token.and_then(non_empty))
    };

    if api_key.is_none() && bearer_token.is_none() {
        app.output.warn("No credentials entered; nothing changed");
        return Ok(());
    }

    let config_file = app.paths.config_file();
    if !config_file.exists() {
        Config::default()
            .save_to_file(&config_file)
            .map_err(|e| eyre!("Failed to write default config to {}: {}", config_file.display(), e))?;
        app.output.info(format!("Created default configuration at {}", config_file.display()));
    }

    let mut cred_store = load_credentials(app)?;
    if let Some(key) = api_key {
        cred_store.set_tmdb_api_key(key);
    }
    if let Some(token) = bearer_token {
        cred_store.set_tmdb_bearer_token(token);
    }
    cred_store
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    app.output.success(format!("Saved TMDB credentials to {}", app.paths.credentials_file().display()));

    if let Some(auth) = cred_store.tmdb_auth() {
        let client = TmdbClient::new(&app.config.tmdb, auth)?;
        match client.genres().await {
            Ok(_) => app.output.success("Verified credentials against TMDB"),
            Err(e) if e.is_unauthorized() => app.output.warn("TMDB rejected these credentials"),
            Err(e) => app.output.warn(format!("Could not verify credentials: {}", e)),
        }
    }
    Ok(())
}

pub fn run_path(app: &App) -> Result<()> {
    let rows = [
        ("config", app.paths.config_file()),
        ("credentials", app.paths.credentials_file()),
        ("data", app.paths.data_dir().to_path_buf()),
        ("logs", app.paths.log_dir().to_path_buf()),
    ];

    if app.output.is_human() {
        let mut table = new_table(["Path", "Location"]);
        for (name, path) in &rows {
            table.add_row(vec![name.to_string(), path.display().to_string()]);
        }
        app.output.table(&table);
    } else {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(name, path)| (name.to_string(), json!(path.display().to_string())))
            .collect();
        app.output.json(&serde_json::Value::Object(map));
    }
    Ok(())
}

fn load_credentials(app: &App) -> Result<CredentialStore> {
    let credentials_file = app.paths.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn display_secret(value: Option<&String>, full: bool) -> String {
    match value {
        Some(v) if full => v.clone(),
        Some(v) => mask_string(v),
        None => "<not set>".to_string(),
    }
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "<not set>".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Output, OutputFormat};
    use cinemate_config::PathManager;

    #[test]
    fn test_show_runs_without_a_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path().join("cinemate"));
        let app = App::new(paths, Config::default(), Output::new(OutputFormat::Json, true)).unwrap();
        run_show(&app, false).unwrap();
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef123"), "ab***23");
    }

    #[test]
    fn test_display_secret() {
        let key = "abcdef123".to_string();
        assert_eq!(display_secret(Some(&key), true), "abcdef123");
        assert_eq!(display_secret(Some(&key), false), "ab***23");
        assert_eq!(display_secret(None, false), "<not set>");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" k ".to_string()), Some("k".to_string()));
    }
}
