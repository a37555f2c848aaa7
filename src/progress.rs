//! Global learning stats shared by every profile.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::storage::{
    Store, KEY_COMPLETED_WORDS, KEY_CURRENT_LEVEL, KEY_GAME_SCORE, KEY_WORD_PROGRESS,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    /// Cumulative quiz score
    pub score: u32,
    /// How many times each word was practiced
    pub attempts: BTreeMap<String, u32>,
    /// Words answered correctly at least once, in first-seen order
    pub completed: Vec<String>,
    pub current_level: Option<String>,
}

impl Progress {
    /// Each key falls back to its default on its own when missing or unreadable.
    pub fn load(store: &Store) -> Self {
        let score = match store.get_item(KEY_GAME_SCORE) {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|e| {
                log::warn!("Ignoring bad {} value {:?}: {}", KEY_GAME_SCORE, raw, e);
                0
            }),
            None => 0,
        };
        let attempts = store
            .get_json::<BTreeMap<String, u32>>(KEY_WORD_PROGRESS)
            .unwrap_or_else(|e| {
                log::warn!("Ignoring bad {}: {}", KEY_WORD_PROGRESS, e);
                None
            })
            .unwrap_or_default();
        let completed = store
            .get_json::<Vec<String>>(KEY_COMPLETED_WORDS)
            .unwrap_or_else(|e| {
                log::warn!("Ignoring bad {}: {}", KEY_COMPLETED_WORDS, e);
                None
            })
            .unwrap_or_default();
        let current_level = store.get_item(KEY_CURRENT_LEVEL).map(str::to_string);

        log::debug!(
            "Loaded progress: score {}, {} practiced, {} completed",
            score,
            attempts.len(),
            completed.len()
        );
        Self {
            score,
            attempts,
            completed,
            current_level,
        }
    }

    pub fn attempts_for(&self, word: &str) -> u32 {
        self.attempts.get(word).copied().unwrap_or(0)
    }

    /// Returns the new attempt count.
    pub fn record_attempt(&mut self, store: &mut Store, word: &str) -> u32 {
        let count = self.attempts.entry(word.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        store.set_json_logged(KEY_WORD_PROGRESS, &self.attempts);
        count
    }

    /// Returns true the first time `word` is read.
    pub fn record_read(&mut self, store: &mut Store, word: &str) -> bool {
        if self.completed.iter().any(|w| w == word) {
            return false;
        }
        self.completed.push(word.to_string());
        store.set_json_logged(KEY_COMPLETED_WORDS, &self.completed);
        true
    }

    pub fn set_score(&mut self, store: &mut Store, score: u32) {
        if self.score == score {
            return;
        }
        self.score = score;
        store.set_item_logged(KEY_GAME_SCORE, score.to_string());
    }

    pub fn set_current_level(&mut self, store: &mut Store, id: &str) {
        self.current_level = Some(id.to_string());
        store.set_item_logged(KEY_CURRENT_LEVEL, id);
    }

    /// Writes every key at once.
    pub fn save(&self, store: &mut Store) -> Result<()> {
        store.set_item(KEY_GAME_SCORE, self.score.to_string())?;
        store.set_json(KEY_WORD_PROGRESS, &self.attempts)?;
        store.set_json(KEY_COMPLETED_WORDS, &self.completed)?;
        match &self.current_level {
            Some(level) => store.set_item(KEY_CURRENT_LEVEL, level.as_str())?,
            None => store.remove_item(KEY_CURRENT_LEVEL)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn score_round_trips_through_the_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let mut store = Store::open(&path).unwrap();
        let mut progress = Progress::load(&store);
        assert_eq!(progress.score, 0);
        progress.set_score(&mut store, 17);

        let reopened = Store::open(&path).unwrap();
        assert_eq!(Progress::load(&reopened).score, 17);
    }

    #[test]
    fn attempts_and_completions_accumulate() {
        let mut store = Store::in_memory();
        let mut progress = Progress::load(&store);
        assert_eq!(progress.record_attempt(&mut store, "cat"), 1);
        assert_eq!(progress.record_attempt(&mut store, "cat"), 2);
        assert!(progress.record_read(&mut store, "cat"));
        assert!(!progress.record_read(&mut store, "cat"));

        let again = Progress::load(&store);
        assert_eq!(again.attempts_for("cat"), 2);
        assert_eq!(again.attempts_for("dog"), 0);
        assert_eq!(again.completed, vec!["cat".to_string()]);
    }

    #[test]
    fn save_writes_every_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let mut store = Store::open(&path).unwrap();
        let progress = Progress {
            score: 4,
            attempts: BTreeMap::from([("sun".to_string(), 3)]),
            completed: vec!["sun".to_string()],
            current_level: Some("2".to_string()),
        };
        progress.save(&mut store).unwrap();
        assert_eq!(Progress::load(&Store::open(&path).unwrap()), progress);
    }

    #[test]
    fn bad_values_fall_back_per_key() {
        let mut store = Store::in_memory();
        store.set_item(KEY_GAME_SCORE, "lots").unwrap();
        store.set_item(KEY_WORD_PROGRESS, "[1,2").unwrap();
        store.set_json(KEY_COMPLETED_WORDS, &["sun"]).unwrap();
        store.set_item(KEY_CURRENT_LEVEL, "3").unwrap();

        let p = Progress::load(&store);
        assert_eq!(p.score, 0);
        assert!(p.attempts.is_empty());
        assert_eq!(p.completed, vec!["sun".to_string()]);
        assert_eq!(p.current_level.as_deref(), Some("3"));
    }
}
