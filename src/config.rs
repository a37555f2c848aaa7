//! User configuration
//!
//! Read once at startup from `config.json` in the platform config
//! directory. A missing file means defaults; a broken one is logged and
//! also means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sampling::BucketWeights;

const APP_DIR: &str = "wordcade";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR_ENV: &str = "WORDCADE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the store and the log live (platform data dir when unset)
    pub data_dir: Option<PathBuf>,
    /// External level catalog replacing the bundled one
    pub levels_file: Option<PathBuf>,
    /// Log filter used when `WORDCADE_LOG` is not set
    pub log_level: String,
    /// Review-mode weights per recency bucket
    pub review_weights: BucketWeights,
    /// Misses the runner tolerates before game over
    pub runner_lives: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            levels_file: None,
            log_level: "info".to_string(),
            review_weights: BucketWeights::default(),
            runner_lives: 3,
        }
    }
}

impl Config {
    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(e) => {
                // Runs before the logger and before raw mode.
                eprintln!("wordcade: ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Resolved data directory: env override, then config, then platform default.
    pub fn data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let res = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "runner_lives": 5 }"#).unwrap();
        let cfg = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.runner_lives, 5);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.review_weights, BucketWeights::default());
    }

    #[test]
    fn old_tick_rate_setting_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tick_rate_ms": 50, "log_level": "debug" }"#).unwrap();
        let cfg = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg, Config { log_level: "debug".to_string(), ..Config::default() });
    }

    #[test]
    fn broken_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
