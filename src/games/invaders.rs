use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{Word, WordPool};
use crate::games::{ticks, Canvas, Game, GameEvent};
use crate::geometry;
use crate::sampling::{pick_uniform, pick_weighted, BucketWeights};

const SPAWN_TICKS: u64 = ticks(3000);
/// Rows per tick at the slowest fall; the fastest is twice this
const WORD_FALL_SPEED: f32 = 0.02;
const PROJECTILE_SPEED: f32 = 0.8;
const MAX_PROJECTILES: usize = 3;
const CANNON_EASE: f32 = 0.1;
const FIRE_THRESHOLD: f32 = 1.0;
/// Rows above the bottom where a falling word is lost
const BOTTOM_BAND: f32 = 3.0;

#[derive(Clone)]
struct FallingWord {
    serial: u64,
    word: Word,
    x: f32,
    y: f32,
    speed: f32,
}

impl FallingWord {
    fn width(&self) -> f32 {
        (self.word.word.chars().count() + 2) as f32
    }

    fn rect(&self) -> geometry::Rect {
        geometry::Rect::new(self.x, self.y, self.width(), 1.0)
    }

    fn center(&self) -> f32 {
        self.x + self.width() / 2.0
    }
}

#[derive(Clone, Copy)]
struct Projectile {
    x: f32,
    y: f32,
}

pub struct Invaders {
    falling: Vec<FallingWord>,
    projectiles: Vec<Projectile>,
    cannon_x: f32,
    target_x: Option<f32>,
    /// Serial of the highlighted word
    selected: Option<u64>,
    next_serial: u64,
    spawn_timer: u64,
    words: Vec<Word>,
    pool: WordPool,
    weights: BucketWeights,
    review_mode: bool,
    score: u32,
    missed: u32,
    tick: u64,
    events: Vec<GameEvent>,
    rng: StdRng,
    // Dynamic dimensions (updated each render)
    field_width: f32,
    field_height: f32,
}

impl Invaders {
    pub fn new(weights: BucketWeights) -> Self {
        Self::with_rng(weights, StdRng::from_entropy())
    }

    fn with_rng(weights: BucketWeights, rng: StdRng) -> Self {
        Self {
            falling: Vec::new(),
            projectiles: Vec::new(),
            cannon_x: 30.0,
            target_x: None,
            selected: None,
            next_serial: 0,
            spawn_timer: 0,
            words: Vec::new(),
            pool: WordPool::default(),
            weights,
            review_mode: false,
            score: 0,
            missed: 0,
            tick: 0,
            events: Vec::new(),
            rng,
            field_width: 60.0,
            field_height: 20.0,
        }
    }

    fn cannon_y(&self) -> f32 {
        self.field_height - 1.0
    }

    fn spawn_word(&mut self) {
        let word = if self.review_mode && !self.pool.review.is_empty() {
            pick_weighted(&self.pool.review, &self.weights, &mut self.rng).cloned()
        } else {
            pick_uniform(&self.words, &mut self.rng).cloned()
        };
        let Some(word) = word else { return };
        let width = (word.word.chars().count() + 2) as f32;
        let max_x = (self.field_width - width).max(0.0);
        let x = self.rng.gen::<f32>() * max_x;
        let speed = (1.0 + self.rng.gen::<f32>()) * WORD_FALL_SPEED;
        log::debug!("Invaders spawned {:?} at x {:.1}", word.word, x);
        self.falling.push(FallingWord {
            serial: self.next_serial,
            word,
            x,
            y: 0.0,
            speed,
        });
        self.next_serial += 1;
        if self.selected.is_none() {
            self.selected = self.falling.last().map(|w| w.serial);
        }
    }

    /// Falling words ordered left to right, as the selection keys see them.
    fn by_position(&self) -> Vec<&FallingWord> {
        let mut sorted: Vec<&FallingWord> = self.falling.iter().collect();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
        sorted
    }

    fn cycle_selection(&mut self, forward: bool) {
        let sorted = self.by_position();
        if sorted.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|s| sorted.iter().position(|w| w.serial == s));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % sorted.len(),
            (Some(i), false) => (i + sorted.len() - 1) % sorted.len(),
        };
        self.selected = Some(sorted[next].serial);
    }

    fn target_selected(&mut self) {
        let Some(serial) = self.selected else { return };
        if let Some(w) = self.falling.iter().find(|w| w.serial == serial) {
            self.target_x = Some(w.center());
        }
    }

    fn update_cannon(&mut self) {
        let Some(target) = self.target_x else { return };
        let diff = target - self.cannon_x;
        if diff.abs() < FIRE_THRESHOLD {
            self.cannon_x = target;
            self.target_x = None;
            if self.projectiles.len() < MAX_PROJECTILES {
                self.projectiles.push(Projectile {
                    x: self.cannon_x,
                    y: self.cannon_y() - 1.0,
                });
            }
        } else {
            self.cannon_x += diff * CANNON_EASE;
        }
    }

    fn update_words(&mut self) {
        let floor = self.field_height - BOTTOM_BAND;
        let mut lost = Vec::new();
        self.falling.retain_mut(|w| {
            w.y += w.speed;
            if w.y >= floor {
                lost.push(w.word.clone());
                false
            } else {
                true
            }
        });
        for word in lost {
            log::debug!("Invaders lost {:?}", word.word);
            self.missed += 1;
            self.events.push(GameEvent::WordMissed(word));
        }
    }

    fn update_projectiles(&mut self) {
        for p in &mut self.projectiles {
            p.y -= PROJECTILE_SPEED;
        }
        self.projectiles.retain(|p| p.y >= 0.0);

        let mut i = 0;
        while i < self.projectiles.len() {
            let p = self.projectiles[i];
            if let Some(hit) = self.falling.iter().position(|w| w.rect().contains_point(p.x, p.y)) {
                let w = self.falling.remove(hit);
                self.projectiles.remove(i);
                self.score += 1;
                self.events.push(GameEvent::WordRead(w.word));
            } else {
                i += 1;
            }
        }
    }

    fn fix_selection(&mut self) {
        let alive = self
            .selected
            .map(|s| self.falling.iter().any(|w| w.serial == s))
            .unwrap_or(false);
        if !alive {
            self.selected = self.by_position().first().map(|w| w.serial);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, Style::default().bg(Color::Rgb(8, 8, 20)));
        let bg = Color::Rgb(8, 8, 20);

        // Stars drift slowly downward
        for i in 0..(width * height / 40) {
            let sx = (i * 37 + 11) % width.max(1);
            let sy = (i * 53 + (self.tick / 30) as usize) % height.max(1);
            canvas.put(sx as i32, sy as i32, '·', Style::default().fg(Color::Rgb(60, 60, 90)).bg(bg));
        }

        // Danger band
        let band = (self.field_height - BOTTOM_BAND).max(0.0) as i32;
        for x in 0..width {
            canvas.put(x as i32, band, '┄', Style::default().fg(Color::Rgb(90, 40, 40)).bg(bg));
        }

        for (i, w) in self.by_position().into_iter().enumerate() {
            let selected = self.selected == Some(w.serial);
            let style = if selected {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(120, 220, 255)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
            };
            let x = w.x.round() as i32;
            let y = w.y as i32;
            canvas.text(x, y, &format!(" {} ", w.word.word), style);
            if i < 9 {
                canvas.put(x, y - 1, char::from(b'1' + i as u8), Style::default().fg(Color::Rgb(120, 120, 160)).bg(bg));
            }
        }

        for p in &self.projectiles {
            canvas.put(p.x.round() as i32, p.y as i32, '┃', Style::default().fg(Color::Rgb(255, 255, 120)).bg(bg).add_modifier(Modifier::BOLD));
        }

        let cy = self.cannon_y() as i32;
        let cx = self.cannon_x.round() as i32;
        let cannon = Style::default().fg(Color::Rgb(80, 255, 120)).bg(bg).add_modifier(Modifier::BOLD);
        canvas.put(cx, cy - 1, '▲', cannon);
        canvas.text(cx - 2, cy, "▟███▙", cannon);

        canvas.into_lines()
    }
}

impl Game for Invaders {
    fn update(&mut self) {
        self.tick += 1;
        self.spawn_timer += 1;
        if self.spawn_timer >= SPAWN_TICKS {
            self.spawn_timer = 0;
            self.spawn_word();
        }
        self.update_words();
        self.update_cannon();
        self.update_projectiles();
        self.fix_selection();
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Left => self.cycle_selection(false),
            KeyCode::Right => self.cycle_selection(true),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Up => self.target_selected(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as u8 - b'1') as usize;
                if let Some(serial) = self.by_position().get(idx).map(|w| w.serial) {
                    self.selected = Some(serial);
                    self.target_selected();
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.review_mode { " 👾 Word Invaders · review " } else { " 👾 Word Invaders " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 255, 80)))
            .title(title)
            .title_style(Style::default().fg(Color::Rgb(100, 255, 100)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status
                Constraint::Min(8),    // Field
                Constraint::Length(1), // Help
            ])
            .split(inner);

        // Rescale positions when the terminal changes size
        let new_fw = chunks[1].width as f32;
        let new_fh = chunks[1].height as f32;
        if (new_fw - self.field_width).abs() > 1.0 || (new_fh - self.field_height).abs() > 1.0 {
            let rx = new_fw / self.field_width;
            let ry = new_fh / self.field_height;
            for w in &mut self.falling {
                w.x *= rx;
                w.y *= ry;
            }
            for p in &mut self.projectiles {
                p.x *= rx;
                p.y *= ry;
            }
            self.cannon_x *= rx;
            self.target_x = self.target_x.map(|t| t * rx);
            self.field_width = new_fw;
            self.field_height = new_fh;
        }

        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.pool.level_name), Style::default().fg(Color::Rgb(200, 120, 255))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Score: {:03} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Missed: {} ", self.missed), Style::default().fg(Color::Rgb(255, 110, 110))),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        if self.words.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                "No words available for this level!",
                Style::default().fg(Color::Red),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(msg, chunks[1]);
        } else {
            let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        }

        let help = Line::from(vec![
            Span::styled(" ←→ Select ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("1-9 Pick ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("ENTER Fire ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Menu", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.falling.clear();
        self.projectiles.clear();
        self.cannon_x = self.field_width / 2.0;
        self.target_x = None;
        self.selected = None;
        self.spawn_timer = 0;
        self.score = 0;
        self.missed = 0;
        self.tick = 0;
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        false
    }

    fn load_words(&mut self, pool: &WordPool) {
        self.words = pool.words.clone();
        self.pool = pool.clone();
        self.reset();
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_review_mode(&mut self, on: bool) {
        self.review_mode = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{key, pool, word};

    fn invaders(words: &[Word]) -> Invaders {
        let mut g = Invaders::with_rng(BucketWeights::default(), StdRng::seed_from_u64(9));
        g.load_words(&pool(words));
        g
    }

    fn place(g: &mut Invaders, text: &str, x: f32, y: f32, speed: f32) -> u64 {
        let serial = g.next_serial;
        g.falling.push(FallingWord {
            serial,
            word: word(text, 1),
            x,
            y,
            speed,
        });
        g.next_serial += 1;
        serial
    }

    #[test]
    fn spawns_on_the_interval() {
        let mut g = invaders(&[word("cat", 1)]);
        for _ in 0..SPAWN_TICKS - 1 {
            g.update();
        }
        assert!(g.falling.is_empty());
        g.update();
        assert_eq!(g.falling.len(), 1);
        let w = &g.falling[0];
        assert!(w.speed >= WORD_FALL_SPEED && w.speed <= WORD_FALL_SPEED * 2.0);
        assert!(w.x >= 0.0 && w.right_edge_fits(g.field_width));
        assert_eq!(g.selected, Some(w.serial));
    }

    #[test]
    fn targeted_word_is_shot_down() {
        let mut g = invaders(&[word("cat", 1)]);
        g.cannon_x = 5.0;
        place(&mut g, "sun", 40.0, 4.0, 0.0);
        g.handle_input(key(KeyCode::Char('1')));
        assert_eq!(g.target_x, Some(42.5));

        let mut events = Vec::new();
        for _ in 0..200 {
            g.update();
            events.extend(g.drain_events());
            if !events.is_empty() {
                break;
            }
        }
        assert_eq!(events, vec![GameEvent::WordRead(word("sun", 1))]);
        assert_eq!(g.get_score(), 1);
        assert!(g.falling.is_empty());
        assert!(g.projectiles.is_empty());
        assert!((g.cannon_x - 42.5).abs() < f32::EPSILON);
    }

    #[test]
    fn words_reaching_the_bottom_are_missed() {
        let mut g = invaders(&[word("cat", 1)]);
        let y = g.field_height - BOTTOM_BAND - 0.5;
        place(&mut g, "dog", 10.0, y, 0.3);
        g.update();
        assert!(g.falling.iter().any(|w| w.word.word == "dog"));
        g.update();
        assert!(g.falling.is_empty());
        assert_eq!(g.drain_events(), vec![GameEvent::WordMissed(word("dog", 1))]);
        assert_eq!(g.get_score(), 0);
    }

    #[test]
    fn selection_cycles_left_to_right() {
        let mut g = invaders(&[word("cat", 1)]);
        let right = place(&mut g, "b", 30.0, 2.0, 0.0);
        let left = place(&mut g, "a", 5.0, 2.0, 0.0);
        g.cycle_selection(true);
        assert_eq!(g.selected, Some(left));
        g.handle_input(key(KeyCode::Right));
        assert_eq!(g.selected, Some(right));
        g.handle_input(key(KeyCode::Right));
        assert_eq!(g.selected, Some(left));
        g.handle_input(key(KeyCode::Left));
        assert_eq!(g.selected, Some(right));
    }

    #[test]
    fn at_most_three_projectiles() {
        let mut g = invaders(&[word("cat", 1)]);
        for _ in 0..5 {
            g.target_x = Some(g.cannon_x);
            g.update_cannon();
        }
        assert_eq!(g.projectiles.len(), MAX_PROJECTILES);
    }

    impl FallingWord {
        fn right_edge_fits(&self, width: f32) -> bool {
            self.x + self.width() <= width
        }
    }
}
