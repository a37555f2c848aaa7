pub mod invaders;
pub mod quiz;
pub mod rampage;
pub mod runner;
pub mod snake;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::content::{Word, WordPool};

/// Milliseconds per tick the game constants are tuned for.
pub const TICK_MS: u64 = 16;

pub const fn ticks(ms: u64) -> u64 {
    ms / TICK_MS
}

/// What happened to a word during play. The app turns these into saved progress.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WordRead(Word),
    WordMissed(Word),
    RoundComplete,
}

pub trait Game {
    fn update(&mut self);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
    /// Replace the word list; called whenever the level changes.
    fn load_words(&mut self, pool: &WordPool);
    fn drain_events(&mut self) -> Vec<GameEvent>;
    fn set_review_mode(&mut self, _on: bool) {}
}

/// Character grid the games draw into before handing rows to ratatui.
pub(crate) struct Canvas {
    cells: Vec<Vec<(char, Style)>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize, fill: Style) -> Self {
        Self {
            cells: vec![vec![(' ', fill); width]; height],
            width,
            height,
        }
    }

    /// Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize][x as usize] = (ch, style);
        }
    }

    pub fn text(&mut self, x: i32, y: i32, s: &str, style: Style) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as i32, y, ch, style);
        }
    }

    pub fn fill_row(&mut self, y: usize, ch: char, style: Style) {
        if y < self.height {
            for cell in &mut self.cells[y] {
                *cell = (ch, style);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Word split into its parts, voiced parts in violet and the rest in blue.
pub(crate) fn word_parts_line(word: &Word) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, part) in word.display_parts().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(Color::Rgb(90, 90, 110))));
        }
        let color = if word.is_voiced(i) {
            Color::Rgb(200, 80, 160)
        } else {
            Color::Rgb(80, 160, 255)
        };
        spans.push(Span::styled(
            part.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
pub(crate) mod testing {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::content::{LevelCatalog, Word, WordPool};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn word(text: &str, dots: u32) -> Word {
        Word {
            id: format!("t-{}", text),
            word: text.to_string(),
            dots,
            audio_file: String::new(),
            level: 1,
            parts: text.chars().map(|c| c.to_string()).collect(),
            voiced: text.chars().map(|_| "v".to_string()).collect(),
        }
    }

    pub fn pool(words: &[Word]) -> WordPool {
        WordPool {
            level_id: "t".to_string(),
            level_name: "Test".to_string(),
            words: words.to_vec(),
            sentences: vec!["One two three.".to_string()],
            review: Vec::new(),
        }
    }

    pub fn bundled_pool(rank: usize) -> WordPool {
        let catalog = LevelCatalog::bundled();
        let id = catalog.levels[rank].id.clone();
        catalog.pool_for(&id).unwrap()
    }
}
