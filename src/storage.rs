//! Local key-value storage
//!
//! String keys, string values (plain numbers or JSON documents), kept in a
//! single JSON object on disk. Every mutation rewrites the file; the last
//! write wins.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub const KEY_GAME_SCORE: &str = "@game_score";
pub const KEY_WORD_PROGRESS: &str = "@word_progress";
pub const KEY_COMPLETED_WORDS: &str = "@completed_words";
pub const KEY_CURRENT_LEVEL: &str = "@current_level";
pub const KEY_CURRENT_PROFILE: &str = "@current_profile";
pub const KEY_PROFILES: &str = "profiles";

pub const STORE_FILE: &str = "store.json";

#[derive(Debug, Clone, Default)]
pub struct Store {
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Open, or start empty at the same path if the file is unusable.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => {
                log::info!("Opened store {} ({} keys)", path.display(), store.entries.len());
                store
            }
            Err(e) => {
                log::error!("Could not read store {}: {}; starting empty", path.display(), e);
                Self {
                    path: Some(path),
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// `Ok(None)` when the key is absent, `Err` when the value is not valid JSON for `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw)
    }

    /// Like `set_item`, but failures are logged instead of returned.
    pub fn set_item_logged(&mut self, key: &str, value: impl Into<String>) {
        if let Err(e) = self.set_item(key, value) {
            log::warn!("Failed to save {}: {}", key, e);
        }
    }

    pub fn set_json_logged<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.set_json(key, value) {
            log::warn!("Failed to save {}: {}", key, e);
        }
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join(STORE_FILE)).unwrap();
        assert!(store.get_item(KEY_GAME_SCORE).is_none());
    }

    #[test]
    fn score_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        {
            let mut store = Store::open(&path).unwrap();
            store.set_item(KEY_GAME_SCORE, 42.to_string()).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.get_item(KEY_GAME_SCORE), Some("42"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join(STORE_FILE);
        let mut store = Store::open(&path).unwrap();
        store.set_item(KEY_CURRENT_LEVEL, "2").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn json_values() {
        let mut store = Store::in_memory();
        let words = vec!["cat".to_string(), "dog".to_string()];
        store.set_json(KEY_COMPLETED_WORDS, &words).unwrap();
        let back: Vec<String> = store.get_json(KEY_COMPLETED_WORDS).unwrap().unwrap();
        assert_eq!(back, words);

        store.set_item(KEY_WORD_PROGRESS, "not json").unwrap();
        let bad: Result<Option<BTreeMap<String, u32>>> = store.get_json(KEY_WORD_PROGRESS);
        assert!(bad.is_err());
    }

    #[test]
    fn remove_item_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        let mut store = Store::open(&path).unwrap();
        store.set_item(KEY_CURRENT_PROFILE, "p1").unwrap();
        store.remove_item(KEY_CURRENT_PROFILE).unwrap();
        let store = Store::open(&path).unwrap();
        assert!(store.get_item(KEY_CURRENT_PROFILE).is_none());
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, b"{{{").unwrap();
        assert!(Store::open(&path).is_err());
        let store = Store::open_or_empty(&path);
        assert!(store.get_item(KEY_GAME_SCORE).is_none());
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
