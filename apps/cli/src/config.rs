use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Application configuration loaded from environment variables. Nothing is
/// strictly required at startup: the API key is only needed once a
/// generation command runs, and the database path has a platform default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub database_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            database_path: match std::env::var("UPWORK_HELPER_DB") {
                Ok(path) => PathBuf::from(path),
                Err(_) => default_database_path()?,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_database_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "upwork-helper")
        .context("Could not determine a data directory for this platform")?;
    std::fs::create_dir_all(dirs.data_dir())
        .with_context(|| format!("Could not create {}", dirs.data_dir().display()))?;
    Ok(dirs.data_dir().join("upworkHelper.db"))
}
