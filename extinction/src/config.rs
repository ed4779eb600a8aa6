//! Settings for locating and fetching survey data.
//!
//! Stored as JSON. Defaults place datasets under `~/.cache/extinction/`;
//! the `EXTINCTION_DATA_DIR` environment variable overrides that root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::map::EvaluationMode;

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "EXTINCTION_DATA_DIR";

/// Extinction layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtinctionConfig {
    /// Root directory holding one sub-directory per map identifier
    pub data_dir: PathBuf,

    /// Attempt a download when a dataset is missing
    pub auto_fetch: bool,

    /// Timeout for a single dataset download
    pub fetch_timeout_secs: u64,

    /// Download URL per map identifier
    pub sources: BTreeMap<String, String>,

    /// Evaluation mode adapters use unless told otherwise
    pub evaluation_mode: EvaluationMode,
}

impl ExtinctionConfig {
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 600;

    /// Get the default data directory path
    pub fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cache").join("extinction")
    }

    /// Settings rooted at a custom data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl Default for ExtinctionConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            auto_fetch: true,
            fetch_timeout_secs: Self::DEFAULT_FETCH_TIMEOUT_SECS,
            sources: BTreeMap::new(),
            evaluation_mode: EvaluationMode::Deferred,
        }
    }
}
