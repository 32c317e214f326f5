//! Configuration file handling.
//!
//! This module provides loading and parsing of the optional `.sqlrepl.json`
//! configuration file, and resolution of the dataset location.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::export::ExportOptions;
use crate::fetch::DEFAULT_FETCH_TIMEOUT;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sqlrepl.json";

/// Environment variable naming the dataset location.
pub const DATASET_ENV_VAR: &str = "SQLREPL_DATASET";

/// Dataset used when nothing else names one.
pub const DEFAULT_DATASET: &str = "./pbp_2021.sqlite";

/// Query offered when a session starts without one.
pub const DEFAULT_QUERY: &str =
    "select count(*) as 'sacks', formation from plays where is_sack = true group by formation";

/// Top-level configuration file structure.
///
/// Every field is optional:
///
/// ```json
/// {
///   "dataset": "https://example.com/pbp_2021.sqlite",
///   "export": { "format": "csv", "null_text": "NULL" },
///   "fetch_timeout_secs": 60,
///   "default_query": "select * from plays"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Dataset location (URL or path)
    pub dataset: Option<String>,
    /// Export defaults
    pub export: ExportOptions,
    /// Remote fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Query the REPL shows as its starting suggestion
    pub default_query: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dataset: None,
            export: ExportOptions::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            default_query: DEFAULT_QUERY.to_string(),
        }
    }
}

impl ConfigFile {
    /// Load `.sqlrepl.json` from the current directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not
    /// valid JSON for this structure.
    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(config_path: &Path) -> Result<Self, Box<dyn Error>> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to read {}: {}", config_path.display(), e),
            )) as Box<dyn Error>
        })?;

        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid JSON in {}: {}", config_path.display(), e),
            )) as Box<dyn Error>
        })?;

        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Pick the dataset location.
    ///
    /// Order: the `--dataset` flag, `SQLREPL_DATASET`, this file's
    /// `dataset`, then [`DEFAULT_DATASET`]. Empty values are skipped.
    pub fn resolve_dataset(&self, flag: Option<&str>) -> String {
        let env = std::env::var(DATASET_ENV_VAR).ok();
        [flag, env.as_deref(), self.dataset.as_deref()]
            .into_iter()
            .flatten()
            .find(|location| !location.trim().is_empty())
            .unwrap_or(DEFAULT_DATASET)
            .to_string()
    }
}

/// Path of the configuration file relative to `dir`.
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}
