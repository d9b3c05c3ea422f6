use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

/// Env var holding the catalog API key.
pub const API_KEY_VAR: &str = "REELBROWSE_API_KEY";
/// Optional override for the directory holding the collection store.
pub const DATA_DIR_VAR: &str = "REELBROWSE_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("REELBROWSE_API_KEY is not set")]
    MissingApiKey,
    #[error("could not determine a data directory; set REELBROWSE_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub store_path: PathBuf,
}

impl Config {
    /// Reads configuration from the environment. The data directory
    /// falls back to the platform's standard app-data location.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let data_dir = match env::var(DATA_DIR_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => ProjectDirs::from("", "", "reelbrowse")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .to_path_buf(),
        };

        Ok(Config {
            api_key,
            store_path: data_dir.join("collections.json"),
        })
    }
}
