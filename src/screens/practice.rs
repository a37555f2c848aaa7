use crossterm::event::{KeyCode, KeyEvent};

use crate::content::{LevelCatalog, Word, WordPool};

/// Word list with a part-by-part sound-out cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Practice {
    pub selected: usize,
    /// Highlighted part, -1 for none
    pub active_part: i32,
    /// Showing every word up to `browse_rank` instead of the current level
    pub browsing: bool,
    pub browse_rank: usize,
}

impl Default for Practice {
    fn default() -> Self {
        Self {
            selected: 0,
            active_part: -1,
            browsing: false,
            browse_rank: 0,
        }
    }
}

impl Practice {
    pub fn words<'a>(&self, catalog: &'a LevelCatalog, pool: &'a WordPool) -> Vec<&'a Word> {
        if self.browsing {
            catalog.words_up_to(self.browse_rank)
        } else {
            pool.words.iter().collect()
        }
    }

    /// Called when the level changes.
    pub fn reset(&mut self, rank: usize) {
        self.selected = 0;
        self.active_part = -1;
        self.browse_rank = rank;
    }

    /// Returns the word to count an attempt for.
    pub fn handle_input(&mut self, key: KeyEvent, catalog: &LevelCatalog, pool: &WordPool) -> Option<Word> {
        let words = self.words(catalog, pool);
        let count = words.len();
        let parts = words
            .get(self.selected)
            .map(|w| w.display_parts().len() as i32)
            .unwrap_or(0);
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                self.active_part = -1;
            }
            KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
                self.active_part = -1;
            }
            KeyCode::Right => self.active_part = (self.active_part + 1).min(parts - 1),
            KeyCode::Left => self.active_part = (self.active_part - 1).max(-1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let word = words.get(self.selected).map(|w| (*w).clone());
                self.active_part = -1;
                return word;
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.browsing = !self.browsing;
                self.selected = 0;
                self.active_part = -1;
            }
            KeyCode::Char('+') | KeyCode::Char('=') if self.browsing => {
                if self.browse_rank + 1 < catalog.levels.len() {
                    self.browse_rank += 1;
                }
                self.active_part = -1;
            }
            KeyCode::Char('-') if self.browsing => {
                self.browse_rank = self.browse_rank.saturating_sub(1);
                let count = catalog.words_up_to(self.browse_rank).len();
                self.selected = self.selected.min(count.saturating_sub(1));
                self.active_part = -1;
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::key;

    fn setup() -> (LevelCatalog, WordPool) {
        let catalog = LevelCatalog::bundled();
        let id = catalog.levels[2].id.clone();
        let pool = catalog.pool_for(&id).unwrap();
        (catalog, pool)
    }

    #[test]
    fn part_cursor_is_clamped() {
        let (catalog, pool) = setup();
        let mut p = Practice::default();
        let parts = pool.words[0].display_parts().len() as i32;
        for _ in 0..10 {
            p.handle_input(key(KeyCode::Right), &catalog, &pool);
        }
        assert_eq!(p.active_part, parts - 1);
        for _ in 0..10 {
            p.handle_input(key(KeyCode::Left), &catalog, &pool);
        }
        assert_eq!(p.active_part, -1);
    }

    #[test]
    fn enter_reports_the_selected_word() {
        let (catalog, pool) = setup();
        let mut p = Practice::default();
        p.handle_input(key(KeyCode::Down), &catalog, &pool);
        p.handle_input(key(KeyCode::Right), &catalog, &pool);
        let word = p.handle_input(key(KeyCode::Enter), &catalog, &pool);
        assert_eq!(word.as_ref(), pool.words.get(1));
        assert_eq!(p.active_part, -1);

        for _ in 0..100 {
            p.handle_input(key(KeyCode::Down), &catalog, &pool);
        }
        assert_eq!(p.selected, pool.words.len() - 1);
    }

    #[test]
    fn browser_lists_earlier_levels() {
        let (catalog, pool) = setup();
        let mut p = Practice::default();
        p.reset(2);
        p.handle_input(key(KeyCode::Char('f')), &catalog, &pool);
        assert!(p.browsing);
        assert_eq!(p.words(&catalog, &pool).len(), catalog.words_up_to(2).len());

        p.handle_input(key(KeyCode::Char('-')), &catalog, &pool);
        p.handle_input(key(KeyCode::Char('-')), &catalog, &pool);
        p.handle_input(key(KeyCode::Char('-')), &catalog, &pool);
        assert_eq!(p.browse_rank, 0);
        for _ in 0..20 {
            p.handle_input(key(KeyCode::Char('+')), &catalog, &pool);
        }
        assert_eq!(p.browse_rank, catalog.levels.len() - 1);

        p.handle_input(key(KeyCode::Char('f')), &catalog, &pool);
        assert_eq!(p.words(&catalog, &pool).len(), pool.words.len());
    }

    #[test]
    fn empty_list_is_harmless() {
        let catalog = LevelCatalog::bundled();
        let pool = WordPool::default();
        let mut p = Practice::default();
        p.handle_input(key(KeyCode::Down), &catalog, &pool);
        p.handle_input(key(KeyCode::Right), &catalog, &pool);
        assert_eq!(p.selected, 0);
        assert_eq!(p.active_part, -1);
        assert!(p.handle_input(key(KeyCode::Enter), &catalog, &pool).is_none());
    }
}
