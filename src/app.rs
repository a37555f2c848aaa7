use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::content::{LevelCatalog, WordPool};
use crate::games::invaders::Invaders;
use crate::games::quiz::Quiz;
use crate::games::rampage::Rampage;
use crate::games::runner::Runner;
use crate::games::snake::Snake;
use crate::games::{Game, GameEvent};
use crate::profiles::Profiles;
use crate::progress::Progress;
use crate::screens::practice::Practice;
use crate::screens::profile::{ProfileAction, ProfileScreen};
use crate::screens::read::ReadAlong;
use crate::storage::Store;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Tab {
    Home,
    Practice,
    Read,
    Quiz,
    Runner,
    Snake,
    Invaders,
    Rampage,
    Profile,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Practice, Tab::Read, Tab::Quiz, Tab::Runner, Tab::Snake, Tab::Invaders, Tab::Rampage, Tab::Profile]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Practice => " Practice ",
            Tab::Read => " Read ",
            Tab::Quiz => " Quiz ",
            Tab::Runner => " Runner ",
            Tab::Snake => " Snake ",
            Tab::Invaders => " Invaders ",
            Tab::Rampage => " Rampage ",
            Tab::Profile => " Profile ",
        }
    }

    pub fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn is_game(&self) -> bool {
        matches!(self, Tab::Quiz | Tab::Runner | Tab::Snake | Tab::Invaders | Tab::Rampage)
    }
}

/// Home tiles, in grid order.
pub const HOME_TILES: [Tab; 8] = [
    Tab::Quiz,
    Tab::Runner,
    Tab::Snake,
    Tab::Invaders,
    Tab::Rampage,
    Tab::Practice,
    Tab::Read,
    Tab::Profile,
];

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PauseItem {
    Resume,
    Restart,
    ReviewMode,
    Profile,
    Games,
}

pub const PAUSE_ITEMS: [PauseItem; 5] = [
    PauseItem::Resume,
    PauseItem::Restart,
    PauseItem::ReviewMode,
    PauseItem::Profile,
    PauseItem::Games,
];

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_tile: usize,
    pub catalog: LevelCatalog,
    pub pool: WordPool,
    pub store: Store,
    pub progress: Progress,
    pub profiles: Profiles,
    pub quiz: Quiz,
    pub runner: Runner,
    pub snake: Snake,
    pub invaders: Invaders,
    pub rampage: Rampage,
    /// Highlighted pause menu entry while the menu is open
    pub pause: Option<usize>,
    pub review_mode: bool,
    pub practice: Practice,
    pub read: ReadAlong,
    pub profile_screen: ProfileScreen,
}

impl App {
    pub fn new(config: &Config, catalog: LevelCatalog, store: Store) -> Self {
        let progress = Progress::load(&store);
        let profiles = Profiles::load(&store);
        let mut app = Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_tile: 0,
            catalog,
            pool: WordPool::default(),
            store,
            progress,
            profiles,
            quiz: Quiz::new(),
            runner: Runner::new(config.review_weights, config.runner_lives),
            snake: Snake::new(config.review_weights),
            invaders: Invaders::new(config.review_weights),
            rampage: Rampage::new(),
            pause: None,
            review_mode: false,
            practice: Practice::default(),
            read: ReadAlong::default(),
            profile_screen: ProfileScreen::default(),
        };
        app.quiz.set_score(app.progress.score);

        let saved = app
            .progress
            .current_level
            .clone()
            .filter(|id| app.catalog.level(id).is_some());
        let start = saved.or_else(|| app.catalog.first().map(|l| l.id.clone()));
        match start {
            Some(id) => {
                app.load_level(&id);
            }
            None => log::warn!("Level catalog is empty"),
        }
        app
    }

    pub fn level_id(&self) -> &str {
        &self.pool.level_id
    }

    fn load_level(&mut self, id: &str) -> bool {
        let pool = match self.catalog.pool_for(id) {
            Ok(pool) => pool,
            Err(e) => {
                log::warn!("Cannot load level: {}", e);
                return false;
            }
        };
        log::info!("Level {} ({} words)", pool.level_name, pool.words.len());
        for game in self.games_mut() {
            game.load_words(&pool);
        }
        self.pool = pool;
        self.practice.reset(self.catalog.rank(id).unwrap_or(0));
        self.read.reset();
        true
    }

    /// Switch level and remember it.
    pub fn select_level(&mut self, id: &str) {
        if id == self.level_id() {
            return;
        }
        if self.load_level(id) {
            self.progress.set_current_level(&mut self.store, id);
        }
    }

    fn games_mut(&mut self) -> [&mut dyn Game; 5] {
        [
            &mut self.quiz,
            &mut self.runner,
            &mut self.snake,
            &mut self.invaders,
            &mut self.rampage,
        ]
    }

    pub fn active_game(&mut self) -> Option<&mut dyn Game> {
        match self.current_tab {
            Tab::Quiz => Some(&mut self.quiz),
            Tab::Runner => Some(&mut self.runner),
            Tab::Snake => Some(&mut self.snake),
            Tab::Invaders => Some(&mut self.invaders),
            Tab::Rampage => Some(&mut self.rampage),
            _ => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn on_tick(&mut self) {
        // Every game timer is a tick counter, so skipping updates freezes them all
        if self.is_paused() {
            return;
        }
        if let Some(game) = self.active_game() {
            game.update();
        }
        self.apply_game_events();
    }

    /// Turn what happened in the active game into saved progress.
    fn apply_game_events(&mut self) {
        let Some(game) = self.active_game() else { return };
        let events = game.drain_events();
        let score = game.get_score();

        for event in events {
            match event {
                GameEvent::WordRead(word) => {
                    if self.progress.record_read(&mut self.store, &word.word) {
                        log::info!("First read of {:?}", word.word);
                    }
                }
                GameEvent::WordMissed(word) => log::debug!("Missed {:?}", word.word),
                GameEvent::RoundComplete => {
                    let level = self.pool.level_id.clone();
                    self.profiles.mark_completed(&mut self.store, &level);
                }
            }
        }

        // The quiz score is a lifetime total; only the round counts per level
        let level_score = if self.current_tab == Tab::Quiz {
            self.progress.set_score(&mut self.store, score);
            self.quiz.round_score()
        } else {
            score
        };
        let level = self.pool.level_id.clone();
        self.profiles.record_score(&mut self.store, &level, level_score);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Typing a profile name takes every key
        if self.current_tab == Tab::Profile && self.profile_screen.is_editing() {
            self.handle_profile_input(key);
            return;
        }

        if self.is_paused() {
            self.handle_pause_input(key);
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.current_tab = Tab::Home;
                    return;
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if self.current_tab.is_game() {
                    self.pause = Some(0);
                    return;
                }
            }
            _ => {}
        }

        match self.current_tab {
            Tab::Home => self.handle_home_input(key),
            Tab::Practice => {
                if let Some(word) = self.practice.handle_input(key, &self.catalog, &self.pool) {
                    let n = self.progress.record_attempt(&mut self.store, &word.word);
                    log::debug!("Practiced {:?} ({} times)", word.word, n);
                }
            }
            Tab::Read => self.read.handle_input(key, &self.pool.sentences),
            Tab::Profile => self.handle_profile_input(key),
            _ => {
                if let Some(game) = self.active_game() {
                    game.handle_input(key);
                }
                self.apply_game_events();
            }
        }
    }

    fn handle_home_input(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() && !key.modifiers.contains(KeyModifiers::SHIFT) {
            return;
        }
        let tiles = HOME_TILES.len();
        match key.code {
            KeyCode::Char(c @ '1'..='8') => {
                self.current_tab = HOME_TILES[(c as u8 - b'1') as usize];
            }
            // Level picker
            KeyCode::Right => {
                if let Some(id) = self.catalog.next_id(self.level_id()).map(str::to_string) {
                    self.select_level(&id);
                }
            }
            KeyCode::Left => {
                if let Some(id) = self.catalog.prev_id(self.level_id()).map(str::to_string) {
                    self.select_level(&id);
                }
            }
            KeyCode::Down => self.selected_tile = (self.selected_tile + 1) % tiles,
            KeyCode::Up => self.selected_tile = (self.selected_tile + tiles - 1) % tiles,
            KeyCode::Enter => self.current_tab = HOME_TILES[self.selected_tile],
            _ => {}
        }
    }

    fn handle_pause_input(&mut self, key: KeyEvent) {
        let Some(selected) = self.pause else { return };
        let items = PAUSE_ITEMS.len();
        match key.code {
            KeyCode::Up => self.pause = Some((selected + items - 1) % items),
            KeyCode::Down => self.pause = Some((selected + 1) % items),
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => self.pause = None,
            KeyCode::Enter => self.choose_pause_item(PAUSE_ITEMS[selected]),
            _ => {}
        }
    }

    fn choose_pause_item(&mut self, item: PauseItem) {
        match item {
            PauseItem::Resume => self.pause = None,
            PauseItem::Restart => {
                if let Some(game) = self.active_game() {
                    game.reset();
                }
                self.pause = None;
            }
            PauseItem::ReviewMode => {
                self.review_mode = !self.review_mode;
                let on = self.review_mode;
                for game in self.games_mut() {
                    game.set_review_mode(on);
                }
                log::info!("Review mode {}", if on { "on" } else { "off" });
            }
            PauseItem::Profile => {
                self.pause = None;
                self.current_tab = Tab::Profile;
            }
            PauseItem::Games => {
                self.pause = None;
                self.current_tab = Tab::Home;
            }
        }
    }

    fn handle_profile_input(&mut self, key: KeyEvent) {
        match self.profile_screen.handle_input(key, &self.profiles) {
            Some(ProfileAction::Select(id)) => {
                self.profiles.select(&mut self.store, &id);
            }
            Some(ProfileAction::Create { name, avatar }) => {
                match self.profiles.create(&mut self.store, &name, &avatar) {
                    Ok(p) => {
                        log::debug!("Profile {} ready", p.id);
                        self.profile_screen.selected = self.profiles.all().len().saturating_sub(1);
                    }
                    Err(e) => {
                        log::warn!("Profile not created: {}", e);
                        self.profile_screen.message = Some(e.to_string());
                    }
                }
            }
            None => {}
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::key;
    use crate::storage::KEY_CURRENT_LEVEL;

    fn app() -> App {
        App::new(&Config::default(), LevelCatalog::bundled(), Store::in_memory())
    }

    fn ticks(app: &mut App, n: usize) {
        for _ in 0..n {
            app.on_tick();
        }
    }

    #[test]
    fn starts_on_the_first_level() {
        let app = app();
        let first = app.catalog.first().unwrap().id.clone();
        assert_eq!(app.level_id(), first);
        assert!(!app.pool.words.is_empty());
    }

    #[test]
    fn level_picker_persists_the_choice() {
        let mut app = app();
        let second = app.catalog.levels[1].id.clone();
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.level_id(), second);
        assert_eq!(app.store.get_item(KEY_CURRENT_LEVEL), Some(second.as_str()));

        // Reopening the same store lands on the saved level
        let reopened = App::new(&Config::default(), LevelCatalog::bundled(), app.store.clone());
        assert_eq!(reopened.level_id(), second);

        app.on_key(key(KeyCode::Left));
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.level_id(), app.catalog.levels[0].id);
    }

    #[test]
    fn quiz_answers_reach_the_store() {
        let mut app = app();
        app.on_key(key(KeyCode::Char('1')));
        assert_eq!(app.current_tab, Tab::Quiz);
        app.on_key(key(KeyCode::Char('y')));
        app.on_tick();
        assert_eq!(app.progress.score, 1);
        assert_eq!(app.progress.completed.len(), 1);
        assert_eq!(Progress::load(&app.store).score, 1);
    }

    #[test]
    fn pause_freezes_the_game() {
        let mut app = app();
        app.current_tab = Tab::Rampage;
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('p')));
        assert!(app.is_paused());
        ticks(&mut app, 3000);
        assert_eq!(app.rampage.get_score(), 0);
        assert!(app.progress.completed.is_empty());

        app.on_key(key(KeyCode::Esc));
        assert!(!app.is_paused());
        // Three hits on the first building
        ticks(&mut app, 1000);
        app.on_key(key(KeyCode::Enter));
        ticks(&mut app, 1000);
        app.on_key(key(KeyCode::Enter));
        ticks(&mut app, 1000);
        assert_eq!(app.rampage.get_score(), 1);
        assert_eq!(app.progress.completed.len(), 1);
    }

    #[test]
    fn pause_menu_actions() {
        let mut app = app();
        app.current_tab = Tab::Snake;
        app.on_key(key(KeyCode::Char('p')));
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Enter));
        assert!(app.review_mode);
        assert!(app.is_paused());

        // Up from the top wraps to Games
        app.pause = Some(0);
        app.on_key(key(KeyCode::Up));
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.current_tab, Tab::Home);
        assert!(!app.is_paused());

        // Non-game tabs have no pause menu
        app.on_key(key(KeyCode::Char('p')));
        assert!(!app.is_paused());
    }

    #[test]
    fn profile_created_from_keys_tracks_high_scores() {
        let mut app = app();
        app.current_tab = Tab::Profile;
        app.on_key(key(KeyCode::Char('n')));
        for c in "Zoe q".chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        // 'q' went into the name, not the quit handler
        assert!(!app.should_quit);
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        let active = app.profiles.active().unwrap();
        assert_eq!(active.name, "Zoe q");

        app.current_tab = Tab::Quiz;
        app.on_key(key(KeyCode::Char('y')));
        app.on_tick();
        let level = app.level_id().to_string();
        assert_eq!(app.profiles.active().unwrap().high_score(&level), 1);
    }

    #[test]
    fn quiz_high_score_is_per_level() {
        let mut app = app();
        app.profiles.create(&mut app.store, "Ana", crate::profiles::AVATARS[0]).unwrap();
        let first = app.level_id().to_string();

        app.current_tab = Tab::Quiz;
        for _ in 0..3 {
            app.on_key(key(KeyCode::Char('y')));
            ticks(&mut app, 100);
        }
        assert_eq!(app.quiz.get_score(), 3);

        app.on_key(key(KeyCode::Esc));
        app.on_key(key(KeyCode::Right));
        let second = app.level_id().to_string();
        assert_ne!(first, second);
        app.current_tab = Tab::Quiz;
        app.on_tick();

        let p = app.profiles.active().unwrap();
        assert_eq!(p.high_score(&first), 3);
        assert_eq!(p.high_score(&second), 0);
        // The lifetime quiz score still carries over
        assert_eq!(app.progress.score, 3);
    }

    #[test]
    fn practice_enter_counts_an_attempt() {
        let mut app = app();
        app.current_tab = Tab::Practice;
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        let first = app.pool.words[0].word.clone();
        assert_eq!(app.progress.attempts_for(&first), 2);
    }

    #[test]
    fn tabs_wrap_both_ways() {
        let mut app = app();
        app.on_key(key(KeyCode::BackTab));
        assert_eq!(app.current_tab, Tab::Profile);
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Home);
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
