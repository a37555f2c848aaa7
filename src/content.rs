//! Static vocabulary: words, levels and the level catalog.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::Bucket;

const BUNDLED_LEVELS: &str = include_str!("../assets/levels.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(default)]
    pub id: String,
    pub word: String,
    /// Syllable count; 0 means "derive from parts"
    #[serde(default)]
    pub dots: u32,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub parts: Vec<String>,
    #[serde(default)]
    pub voiced: Vec<String>,
}

impl Word {
    pub fn syllables(&self) -> u32 {
        if self.dots > 0 {
            self.dots
        } else {
            (self.parts.len() as u32).max(1)
        }
    }

    pub fn is_voiced(&self, part: usize) -> bool {
        self.voiced.get(part).map(|v| v == "v").unwrap_or(false)
    }

    /// Parts to show when splitting the word; the whole word if it has none.
    pub fn display_parts(&self) -> Vec<&str> {
        if self.parts.is_empty() {
            vec![self.word.as_str()]
        } else {
            self.parts.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub complete_video: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub sentences: Vec<String>,
}

impl Level {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LevelCatalog {
    pub levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_LEVELS) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Bundled level data is broken: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut catalog: LevelCatalog = serde_json::from_str(text)?;
        catalog.fill_missing_ids();
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Words without an id get `<level>-<n>`, words without a level get their level's rank.
    fn fill_missing_ids(&mut self) {
        for (rank, level) in self.levels.iter_mut().enumerate() {
            for (i, word) in level.words.iter_mut().enumerate() {
                if word.id.is_empty() {
                    word.id = format!("{}-{}", level.id, i + 1);
                }
                if word.level == 0 {
                    word.level = rank as u32 + 1;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn rank(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    pub fn next_id(&self, id: &str) -> Option<&str> {
        let rank = self.rank(id)?;
        self.levels.get(rank + 1).map(|l| l.id.as_str())
    }

    pub fn prev_id(&self, id: &str) -> Option<&str> {
        let rank = self.rank(id)?;
        rank.checked_sub(1)
            .and_then(|r| self.levels.get(r))
            .map(|l| l.id.as_str())
    }

    /// Every word from levels ranked at or below `rank`.
    pub fn words_up_to(&self, rank: usize) -> Vec<&Word> {
        self.levels
            .iter()
            .take(rank + 1)
            .flat_map(|l| l.words.iter())
            .collect()
    }

    /// Words a game needs for `id`: the level itself plus the review pool.
    pub fn pool_for(&self, id: &str) -> Result<WordPool> {
        let rank = self.rank(id).ok_or_else(|| Error::UnknownLevel(id.to_string()))?;
        let level = &self.levels[rank];
        let review = self.levels[..=rank]
            .iter()
            .enumerate()
            .flat_map(|(r, l)| {
                let bucket = Bucket::from_distance(rank - r);
                l.words.iter().map(move |w| (w.clone(), bucket))
            })
            .collect();
        Ok(WordPool {
            level_id: level.id.clone(),
            level_name: level.display_name().to_string(),
            words: level.words.clone(),
            sentences: level.sentences.clone(),
            review,
        })
    }
}

/// The words handed to a game when a level is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordPool {
    pub level_id: String,
    pub level_name: String,
    pub words: Vec<Word>,
    pub sentences: Vec<String>,
    /// Words of this and all earlier levels, tagged by recency
    pub review: Vec<(Word, Bucket)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameWord {
    pub word: Word,
    pub completed: bool,
}

/// One pass over a level's words; completion only moves forward until `reset`.
#[derive(Debug, Clone, Default)]
pub struct Round {
    words: Vec<GameWord>,
}

impl Round {
    pub fn new(words: &[Word]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| GameWord {
                    word: w.clone(),
                    completed: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn remaining(&self) -> Vec<&GameWord> {
        self.words.iter().filter(|w| !w.completed).collect()
    }

    pub fn all_completed(&self) -> bool {
        !self.words.is_empty() && self.words.iter().all(|w| w.completed)
    }

    /// Returns false if the id is unknown.
    pub fn mark_completed(&mut self, id: &str) -> bool {
        match self.words.iter_mut().find(|w| w.word.id == id) {
            Some(w) => {
                w.completed = true;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        for w in &mut self.words {
            w.completed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> LevelCatalog {
        LevelCatalog::bundled()
    }

    #[test]
    fn bundled_catalog_parses() {
        let c = catalog();
        assert!(c.levels.len() >= 5);
        for level in &c.levels {
            assert!(!level.words.is_empty(), "level {} has no words", level.id);
            for w in &level.words {
                assert_eq!(w.parts.len(), w.voiced.len(), "{}", w.word);
                assert!(w.syllables() >= 1);
            }
        }
    }

    #[test]
    fn missing_fields_are_filled() {
        let c = LevelCatalog::from_json(
            r#"{ "levels": [ { "id": "a", "words": [ { "word": "hi", "parts": ["h", "i"] } ] } ] }"#,
        )
        .unwrap();
        let w = &c.levels[0].words[0];
        assert_eq!(w.id, "a-1");
        assert_eq!(w.level, 1);
        assert_eq!(w.syllables(), 2);
        assert!(!w.is_voiced(0));
        assert_eq!(c.levels[0].display_name(), "a");
    }

    #[test]
    fn navigation_between_levels() {
        let c = catalog();
        let first = c.first().unwrap().id.clone();
        assert_eq!(c.prev_id(&first), None);
        let second = c.next_id(&first).unwrap().to_string();
        assert_eq!(c.prev_id(&second), Some(first.as_str()));
        assert_eq!(c.next_id("nope"), None);
    }

    #[test]
    fn pool_tags_review_words_by_distance() {
        let c = catalog();
        let id = c.levels[4].id.clone();
        let pool = c.pool_for(&id).unwrap();
        assert_eq!(pool.words, c.levels[4].words);
        let count = |b: Bucket| pool.review.iter().filter(|(_, bb)| *bb == b).count();
        assert_eq!(count(Bucket::Current), c.levels[4].words.len());
        assert_eq!(count(Bucket::Recent), c.levels[3].words.len());
        assert_eq!(count(Bucket::Past), c.levels[1].words.len() + c.levels[2].words.len());
        assert_eq!(count(Bucket::Ancient), c.levels[0].words.len());
    }

    #[test]
    fn unknown_level_is_error() {
        assert!(matches!(catalog().pool_for("zzz"), Err(Error::UnknownLevel(_))));
    }

    #[test]
    fn words_up_to_filters_by_rank() {
        let c = catalog();
        let n = c.levels[0].words.len() + c.levels[1].words.len();
        assert_eq!(c.words_up_to(1).len(), n);
        assert!(c.words_up_to(1).iter().all(|w| w.level <= 2));
    }

    #[test]
    fn round_completion_is_monotonic() {
        let c = catalog();
        let words = &c.levels[0].words;
        let mut round = Round::new(words);
        for w in words {
            assert!(round.mark_completed(&w.id));
            // Marking again never un-completes
            assert!(round.mark_completed(&w.id));
            assert!(round.remaining().iter().all(|g| g.word.id != w.id));
        }
        assert!(round.all_completed());
        assert!(round.remaining().is_empty());
        round.reset();
        assert_eq!(round.remaining().len(), words.len());
        assert!(!round.mark_completed("missing"));
    }
}
