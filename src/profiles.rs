//! Saved player profiles and their per-level results.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{Store, KEY_CURRENT_PROFILE, KEY_PROFILES};

pub const MAX_NAME_LEN: usize = 12;

pub const AVATARS: [&str; 6] = ["🦊", "🐸", "🐼", "🦖", "🐙", "🚀"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelResult {
    pub high_score: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub levels: BTreeMap<String, LevelResult>,
}

impl Profile {
    pub fn high_score(&self, level_id: &str) -> u32 {
        self.levels.get(level_id).map(|l| l.high_score).unwrap_or(0)
    }

    pub fn completed_levels(&self) -> usize {
        self.levels.values().filter(|l| l.completed).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Profiles {
    list: Vec<Profile>,
    active: Option<String>,
}

impl Profiles {
    pub fn load(store: &Store) -> Self {
        let list: Vec<Profile> = store
            .get_json(KEY_PROFILES)
            .unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable profiles: {}", e);
                None
            })
            .unwrap_or_default();
        let active = store
            .get_item(KEY_CURRENT_PROFILE)
            .filter(|id| list.iter().any(|p| p.id == *id))
            .map(str::to_string)
            .or_else(|| list.first().map(|p| p.id.clone()));
        log::info!("Loaded {} profiles", list.len());
        Self { list, active }
    }

    pub fn all(&self) -> &[Profile] {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn active(&self) -> Option<&Profile> {
        let id = self.active.as_deref()?;
        self.list.iter().find(|p| p.id == id)
    }

    fn active_mut(&mut self) -> Option<&mut Profile> {
        let id = self.active.clone()?;
        self.list.iter_mut().find(|p| p.id == id)
    }

    /// Adds a profile, makes it active and persists both.
    pub fn create(&mut self, store: &mut Store, name: &str, avatar: &str) -> Result<&Profile> {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return Err(Error::InvalidProfile("name is required"));
        }
        if avatar.is_empty() {
            return Err(Error::InvalidProfile("avatar is required"));
        }
        let id = self.fresh_id();
        log::info!("Creating profile {} ({})", name, id);
        self.list.push(Profile {
            id: id.clone(),
            name,
            avatar: avatar.to_string(),
            levels: BTreeMap::new(),
        });
        self.active = Some(id);
        self.save(store)?;
        store.set_item(KEY_CURRENT_PROFILE, self.active.clone().unwrap_or_default())?;
        Ok(&self.list[self.list.len() - 1])
    }

    /// Millisecond timestamp, bumped until unique.
    fn fresh_id(&self) -> String {
        let mut n = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        while self.list.iter().any(|p| p.id == n.to_string()) {
            n += 1;
        }
        n.to_string()
    }

    /// Returns false for an unknown id.
    pub fn select(&mut self, store: &mut Store, id: &str) -> bool {
        if !self.list.iter().any(|p| p.id == id) {
            return false;
        }
        self.active = Some(id.to_string());
        store.set_item_logged(KEY_CURRENT_PROFILE, id);
        true
    }

    /// Raise the active profile's high score for `level_id`. Returns true if it rose.
    pub fn record_score(&mut self, store: &mut Store, level_id: &str, score: u32) -> bool {
        let Some(p) = self.active_mut() else { return false };
        let entry = p.levels.entry(level_id.to_string()).or_default();
        if score <= entry.high_score {
            return false;
        }
        entry.high_score = score;
        log::info!("New high score {} on level {} for {}", score, level_id, p.name);
        self.save_logged(store);
        true
    }

    pub fn mark_completed(&mut self, store: &mut Store, level_id: &str) {
        let Some(p) = self.active_mut() else { return };
        let entry = p.levels.entry(level_id.to_string()).or_default();
        if entry.completed {
            return;
        }
        entry.completed = true;
        self.save_logged(store);
    }

    pub fn save(&self, store: &mut Store) -> Result<()> {
        store.set_json(KEY_PROFILES, &self.list)
    }

    fn save_logged(&self, store: &mut Store) {
        if let Err(e) = self.save(store) {
            log::warn!("Failed to save profiles: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_avatar() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        assert!(matches!(
            profiles.create(&mut store, "   ", AVATARS[0]),
            Err(Error::InvalidProfile(_))
        ));
        assert!(matches!(
            profiles.create(&mut store, "Sam", ""),
            Err(Error::InvalidProfile(_))
        ));
        assert!(profiles.is_empty());
    }

    #[test]
    fn created_profile_is_active_and_persisted() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        let id = profiles
            .create(&mut store, "A very long player name", AVATARS[1])
            .unwrap()
            .id
            .clone();
        assert_eq!(profiles.active().unwrap().name.chars().count(), MAX_NAME_LEN);

        let reloaded = Profiles::load(&store);
        assert_eq!(reloaded.all().len(), 1);
        assert_eq!(reloaded.active().unwrap().id, id);
    }

    #[test]
    fn ids_are_unique() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        let a = profiles.create(&mut store, "A", AVATARS[0]).unwrap().id.clone();
        let b = profiles.create(&mut store, "B", AVATARS[0]).unwrap().id.clone();
        assert_ne!(a, b);
        assert!(profiles.select(&mut store, &a));
        assert!(!profiles.select(&mut store, "nope"));
        assert_eq!(Profiles::load(&store).active().unwrap().id, a);
    }

    #[test]
    fn high_score_never_decreases() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        profiles.create(&mut store, "Kim", AVATARS[2]).unwrap();
        assert!(profiles.record_score(&mut store, "1", 10));
        assert!(!profiles.record_score(&mut store, "1", 4));
        assert!(!profiles.record_score(&mut store, "1", 10));
        assert!(profiles.record_score(&mut store, "1", 11));
        profiles.mark_completed(&mut store, "1");

        let reloaded = Profiles::load(&store);
        let p = reloaded.active().unwrap();
        assert_eq!(p.high_score("1"), 11);
        assert_eq!(p.high_score("2"), 0);
        assert_eq!(p.completed_levels(), 1);
    }

    #[test]
    fn no_active_profile_records_nothing() {
        let mut store = Store::in_memory();
        let mut profiles = Profiles::load(&store);
        assert!(!profiles.record_score(&mut store, "1", 5));
        assert!(store.get_item(KEY_PROFILES).is_none());
    }

    #[test]
    fn reads_camel_case_profiles() {
        let mut store = Store::in_memory();
        store
            .set_item(
                KEY_PROFILES,
                r#"[{"id":"1700000000000","name":"Ana","avatar":"assets/images/avatars/avatar1.png",
                    "levels":{"1":{"highScore":7,"completed":true}}}]"#,
            )
            .unwrap();
        let profiles = Profiles::load(&store);
        let p = profiles.active().unwrap();
        assert_eq!(p.name, "Ana");
        assert_eq!(p.high_score("1"), 7);
    }
}
