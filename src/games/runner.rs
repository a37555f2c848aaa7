use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{Word, WordPool};
use crate::games::{ticks, word_parts_line, Canvas, Game, GameEvent};
use crate::geometry;
use crate::sampling::{pick_uniform, pick_weighted, BucketWeights};

const RUNNER_X: f32 = 10.0;
const RUNNER_W: f32 = 3.0;
const RUNNER_H: f32 = 3.0;
const BASE_SPAWN_DELAY: u64 = ticks(2000);
const RANDOM_EXTRA_DELAY: u64 = ticks(2000);
const BASE_WORD_SPEED: f32 = 0.4;
const JUMP_HEIGHT: f32 = 6.0;
const GRAVITY: f32 = 0.12;
const JUMP_COOLDOWN: u64 = ticks(1000);
const RUN_FRAME_TICKS: u64 = ticks(200);
const SPEED_FLASH_TICKS: u64 = ticks(200);
/// How many ticks ahead of contact a clicked word triggers the jump
const JUMP_LEAD_TICKS: f32 = 4.0;
const MAX_WORD_BOX: usize = 12;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Jump {
    Grounded,
    Rising,
    Falling,
}

#[derive(Clone)]
struct RunnerWord {
    word: Word,
    x: f32,
    speed: f32,
    /// Jumped over; scores on landing
    cleared: bool,
}

impl RunnerWord {
    fn width(&self) -> f32 {
        (self.word.word.chars().count() + 2).min(MAX_WORD_BOX) as f32
    }
}

pub struct Runner {
    runner_y: f32,
    jump: Jump,
    cooldown: u64,
    clicked: bool,
    current: Option<RunnerWord>,
    /// Word of the last jump, scored when the runner lands
    pending_score: Option<Word>,
    /// Shown until dismissed; freezes the run
    missed: Option<Word>,
    words: Vec<Word>,
    pool: WordPool,
    weights: BucketWeights,
    review_mode: bool,
    score: u32,
    high_score: u32,
    lives: u32,
    max_lives: u32,
    game_over: bool,
    started: bool,
    tick: u64,
    next_spawn_tick: u64,
    speed_flash: u64,
    background_offset: usize,
    foreground_offset: f32,
    events: Vec<GameEvent>,
    rng: StdRng,
    // Dynamic dimensions (updated each render)
    field_width: usize,
    ground_y: f32,
}

impl Runner {
    pub fn new(weights: BucketWeights, lives: u32) -> Self {
        Self::with_rng(weights, lives, StdRng::from_entropy())
    }

    fn with_rng(weights: BucketWeights, lives: u32, rng: StdRng) -> Self {
        let lives = lives.max(1);
        let mut r = Self {
            runner_y: 15.0,
            jump: Jump::Grounded,
            cooldown: 0,
            clicked: false,
            current: None,
            pending_score: None,
            missed: None,
            words: Vec::new(),
            pool: WordPool::default(),
            weights,
            review_mode: false,
            score: 0,
            high_score: 0,
            lives,
            max_lives: lives,
            game_over: false,
            started: false,
            tick: 0,
            next_spawn_tick: 0,
            speed_flash: 0,
            background_offset: 0,
            foreground_offset: 0.0,
            events: Vec::new(),
            rng,
            field_width: 70,
            ground_y: 15.0,
        };
        r.schedule_next_spawn();
        r
    }

    fn schedule_next_spawn(&mut self) {
        let extra = self.rng.gen_range(0..=RANDOM_EXTRA_DELAY);
        self.next_spawn_tick = self.tick + BASE_SPAWN_DELAY + extra;
        self.clicked = false;
    }

    fn pick_word(&mut self) -> Option<Word> {
        if self.review_mode && !self.pool.review.is_empty() {
            return pick_weighted(&self.pool.review, &self.weights, &mut self.rng).cloned();
        }
        pick_uniform(&self.words, &mut self.rng).cloned()
    }

    fn spawn_word(&mut self) {
        let Some(word) = self.pick_word() else { return };
        let speed = (1.0 + self.rng.gen::<f32>()) * BASE_WORD_SPEED;
        log::debug!("Runner spawned {:?} at speed {:.2}", word.word, speed);
        self.current = Some(RunnerWord {
            word,
            x: self.field_width as f32,
            speed,
            cleared: false,
        });
        self.clicked = false;
        self.speed_flash = SPEED_FLASH_TICKS;
    }

    fn runner_rect(&self) -> geometry::Rect {
        geometry::Rect::new(RUNNER_X, self.runner_y, RUNNER_W, RUNNER_H)
    }

    /// The word slides along the runner's feet row.
    fn word_rect(&self, w: &RunnerWord) -> geometry::Rect {
        geometry::Rect::new(w.x, self.ground_y + RUNNER_H - 1.0, w.width(), 1.0)
    }

    fn jump_trigger_x(speed: f32) -> f32 {
        RUNNER_X + RUNNER_W + 1.0 + JUMP_LEAD_TICKS * speed
    }

    fn update_jump(&mut self) {
        match self.jump {
            Jump::Grounded => {
                self.cooldown = self.cooldown.saturating_sub(1);
            }
            Jump::Rising => {
                self.runner_y -= GRAVITY * 4.0;
                if self.runner_y <= self.ground_y - JUMP_HEIGHT {
                    self.runner_y = self.ground_y - JUMP_HEIGHT;
                    self.jump = Jump::Falling;
                }
            }
            Jump::Falling => {
                self.runner_y += GRAVITY;
                if self.runner_y >= self.ground_y {
                    self.runner_y = self.ground_y;
                    self.jump = Jump::Grounded;
                    self.cooldown = JUMP_COOLDOWN;
                    if let Some(word) = self.pending_score.take() {
                        self.score += 1;
                        self.events.push(GameEvent::WordRead(word));
                    }
                }
            }
        }
    }

    fn miss(&mut self, word: Word) {
        log::info!("Runner missed {:?}", word.word);
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::WordMissed(word.clone()));
        self.current = None;
        self.pending_score = None;
        self.schedule_next_spawn();
        if self.lives == 0 {
            self.game_over = true;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
        } else {
            self.missed = Some(word);
        }
    }

    fn dismiss_missed(&mut self) {
        self.missed = None;
        self.clicked = false;
        // Give the player the full delay again after reading the word
        self.schedule_next_spawn();
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, Style::default());
        let ground_row = (self.ground_y + RUNNER_H) as usize;

        // Sky
        for y in 0..height.min(ground_row) {
            let b = 15 + (y * 4).min(40) as u8;
            canvas.fill_row(y, ' ', Style::default().bg(Color::Rgb(b / 2, b / 2, b + 10)));
        }

        // Far hills scroll slower than the ground
        let hills = "  ▁▂▃▄▅▆▅▄▃▂▁    ▁▂▃▂▁      ";
        let hill_chars: Vec<char> = hills.chars().collect();
        if ground_row >= 1 && ground_row - 1 < height {
            for x in 0..width {
                let ch = hill_chars[(x + self.background_offset / 4) % hill_chars.len()];
                if ch != ' ' {
                    canvas.put(x as i32, ground_row as i32 - 1, ch, Style::default().fg(Color::Rgb(40, 70, 60)));
                }
            }
        }

        // Ground
        if ground_row < height {
            let fg = self.foreground_offset as usize;
            for x in 0..width {
                let ch = if (x + fg) % 8 == 0 { '▪' } else if (x + fg) % 4 == 0 { '·' } else { '━' };
                canvas.put(x as i32, ground_row as i32, ch, Style::default().fg(Color::Rgb(140, 120, 100)));
            }
        }
        for dy in 1..3 {
            let row = ground_row + dy;
            if row < height {
                canvas.fill_row(row, ' ', Style::default().bg(Color::Rgb(30, 25, 20)));
            }
        }

        // The moving word
        if let Some(w) = &self.current {
            let r = self.word_rect(w);
            let x0 = r.x.round() as i32;
            let y = r.y as i32;
            let inner: String = w.word.word.chars().take(MAX_WORD_BOX - 2).collect();
            let label = format!("[{}]", inner);
            let style = if self.clicked {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(120, 220, 120)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
            };
            canvas.text(x0, y, &label, style);
        }

        // Runner
        let top = self.runner_y.round() as i32;
        let body = Style::default().fg(Color::Rgb(120, 200, 255)).add_modifier(Modifier::BOLD);
        let flash = Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD);
        let frame_idx = (self.tick / RUN_FRAME_TICKS) % 4;
        let head = if self.speed_flash > 0 { flash } else { body };
        canvas.text(RUNNER_X as i32, top, " o ", head);
        canvas.text(RUNNER_X as i32, top + 1, "/|\\", body);
        let legs = match (self.jump, frame_idx) {
            (Jump::Grounded, 0) | (Jump::Grounded, 2) => "/ \\",
            (Jump::Grounded, 1) => " |\\",
            (Jump::Grounded, _) => "/| ",
            _ => "< >",
        };
        canvas.text(RUNNER_X as i32, top + 2, legs, body);
        if self.speed_flash > 0 {
            canvas.text(RUNNER_X as i32 - 3, top + 1, "≡≡", Style::default().fg(Color::Rgb(255, 200, 80)));
        }

        canvas.into_lines()
    }

    fn render_missed(&self, frame: &mut Frame, area: Rect, word: &Word) {
        let w = 40u16.min(area.width.saturating_sub(4));
        let h = 9u16.min(area.height.saturating_sub(2));
        let overlay = Rect::new(
            area.x + area.width.saturating_sub(w) / 2,
            area.y + area.height.saturating_sub(h) / 2,
            w,
            h,
        );
        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Rgb(255, 120, 80)))
            .title(" Missed word ")
            .title_style(Style::default().fg(Color::Rgb(255, 120, 80)).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Rgb(15, 15, 25)));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                word.word.clone(),
                Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            word_parts_line(word),
            Line::from(""),
            Line::from(Span::styled(
                "ENTER to keep running",
                Style::default().fg(Color::Rgb(120, 120, 140)),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

impl Game for Runner {
    fn update(&mut self) {
        if self.game_over || !self.started || self.missed.is_some() {
            return;
        }

        self.tick += 1;
        self.background_offset = (self.background_offset + 1) % 10000;
        self.speed_flash = self.speed_flash.saturating_sub(1);

        self.update_jump();

        let Some(mut w) = self.current.take() else {
            if self.tick >= self.next_spawn_tick {
                self.spawn_word();
                if self.current.is_none() {
                    // Nothing to spawn; check again later
                    self.schedule_next_spawn();
                }
            }
            return;
        };

        w.x -= w.speed;
        self.foreground_offset = (self.foreground_offset + w.speed) % 10000.0;

        // Off the left edge: next word
        if w.x + w.width() <= 0.0 {
            self.schedule_next_spawn();
            return;
        }

        if self.clicked
            && !w.cleared
            && self.jump == Jump::Grounded
            && self.cooldown == 0
            && w.x <= Self::jump_trigger_x(w.speed)
        {
            w.cleared = true;
            self.jump = Jump::Rising;
            self.pending_score = Some(w.word.clone());
        }

        if self.runner_rect().overlaps(&self.word_rect(&w)) {
            self.miss(w.word);
            return;
        }

        self.current = Some(w);
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if self.missed.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.dismiss_missed();
            }
            return;
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Up => {
                if self.game_over {
                    self.reset();
                    return;
                }
                if !self.started {
                    self.started = true;
                    self.runner_y = self.ground_y;
                    self.schedule_next_spawn();
                    return;
                }
                // "Clicking" the word: only counts while one is on screen
                if self.current.is_some() {
                    self.clicked = true;
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.review_mode { " 🏃 Word Runner · review " } else { " 🏃 Word Runner " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 180, 255)))
            .title(title)
            .title_style(Style::default().fg(Color::Rgb(120, 200, 255)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Length(3), // The word to read
                Constraint::Min(8),    // Field
                Constraint::Length(1), // Help
            ])
            .split(inner);

        // Keep dimensions in sync with the terminal; the ground only moves between runs
        let field_height = chunks[2].height as usize;
        let new_ground_y = ((field_height as f32 * 0.7) - RUNNER_H).max(JUMP_HEIGHT + 1.0);
        if !self.started || self.game_over {
            self.ground_y = new_ground_y;
            self.runner_y = new_ground_y;
        }
        self.field_width = chunks[2].width as usize;

        let hearts: String = (0..self.max_lives)
            .map(|i| if i < self.lives { '♥' } else { '♡' })
            .collect();
        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.pool.level_name), Style::default().fg(Color::Rgb(200, 120, 255))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Score: {:03} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 {:03} ", self.high_score), Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(hearts, Style::default().fg(Color::Rgb(255, 90, 90))),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let prompt = match &self.current {
            Some(w) => Line::from(vec![
                Span::styled(
                    format!("  {}  ", w.word.word),
                    Style::default().fg(Color::Rgb(20, 20, 20)).bg(if self.clicked {
                        Color::Rgb(120, 220, 120)
                    } else {
                        Color::Rgb(255, 220, 80)
                    }).add_modifier(Modifier::BOLD),
                ),
            ]),
            None if self.words.is_empty() => Line::from(Span::styled(
                "No words available for this level!",
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled("Word Runner", Style::default().fg(Color::Rgb(100, 100, 130)))),
        };
        let prompt_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 60, 80)));
        frame.render_widget(
            Paragraph::new(prompt).alignment(Alignment::Center).block(prompt_block),
            chunks[1],
        );

        let lines = self.render_field(chunks[2].width as usize, chunks[2].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[2]);

        let help = if self.game_over {
            Line::from(vec![
                Span::styled(" 💀 GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(format!("Score: {} │ ", self.score), Style::default().fg(Color::Yellow)),
                Span::styled("ENTER to run again, Esc for menu", Style::default().fg(Color::Gray)),
            ])
        } else if !self.started {
            Line::from(vec![
                Span::styled(" ▶ Press SPACE to start! ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled("Read the word, press SPACE to jump over it", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" SPACE/ENTER I read it ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Menu ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[3]);

        if let Some(word) = &self.missed {
            self.render_missed(frame, inner, word);
        }
    }

    fn reset(&mut self) {
        let hs = self.high_score.max(self.score);
        let fw = self.field_width;
        let gy = self.ground_y;
        self.score = 0;
        self.high_score = hs;
        self.lives = self.max_lives;
        self.game_over = false;
        self.started = false;
        self.current = None;
        self.pending_score = None;
        self.missed = None;
        self.jump = Jump::Grounded;
        self.cooldown = 0;
        self.tick = 0;
        self.speed_flash = 0;
        self.field_width = fw;
        self.ground_y = gy;
        self.runner_y = gy;
        self.schedule_next_spawn();
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
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
    use crate::games::testing::{bundled_pool, key, pool, word};
    use crate::sampling::Bucket;

    fn runner(lives: u32) -> Runner {
        let mut r = Runner::with_rng(BucketWeights::default(), lives, StdRng::seed_from_u64(11));
        r.field_width = 60;
        r.ground_y = 10.0;
        r.runner_y = 10.0;
        r
    }

    fn start(r: &mut Runner) {
        r.handle_input(key(KeyCode::Char(' ')));
        assert!(r.started);
    }

    /// Run until a word is on the field.
    fn until_spawn(r: &mut Runner) {
        for _ in 0..1000 {
            if r.current.is_some() {
                return;
            }
            r.update();
        }
        panic!("no word spawned");
    }

    fn until_event(r: &mut Runner) -> Vec<GameEvent> {
        for _ in 0..2000 {
            r.update();
            let ev = r.drain_events();
            if !ev.is_empty() {
                return ev;
            }
        }
        panic!("no event");
    }

    #[test]
    fn clicked_word_is_jumped_and_scored() {
        let mut r = runner(3);
        r.load_words(&pool(&[word("elephant", 3)]));
        start(&mut r);
        until_spawn(&mut r);
        r.handle_input(key(KeyCode::Enter));
        assert!(r.clicked);

        let events = until_event(&mut r);
        assert_eq!(events, vec![GameEvent::WordRead(word("elephant", 3))]);
        assert_eq!(r.get_score(), 1);
        assert_eq!(r.lives, 3);
        assert_eq!(r.jump, Jump::Grounded);
    }

    #[test]
    fn ignored_word_collides() {
        let mut r = runner(3);
        r.load_words(&pool(&[word("cat", 1)]));
        start(&mut r);
        let events = until_event(&mut r);
        assert_eq!(events, vec![GameEvent::WordMissed(word("cat", 1))]);
        assert_eq!(r.lives, 2);
        assert!(r.missed.is_some());

        // Frozen while the missed word is shown
        let tick = r.tick;
        for _ in 0..50 {
            r.update();
        }
        assert_eq!(r.tick, tick);

        // Any other key does not dismiss, ENTER does
        r.handle_input(key(KeyCode::Char('x')));
        assert!(r.missed.is_some());
        r.handle_input(key(KeyCode::Enter));
        assert!(r.missed.is_none());
        assert!(!r.clicked);
        r.update();
        assert_eq!(r.tick, tick + 1);
    }

    #[test]
    fn last_life_ends_the_run() {
        let mut r = runner(1);
        r.load_words(&pool(&[word("dog", 1)]));
        start(&mut r);
        until_event(&mut r);
        assert!(r.is_game_over());
        assert!(r.missed.is_none());
        r.handle_input(key(KeyCode::Enter));
        assert!(!r.is_game_over());
        assert_eq!(r.lives, 1);
    }

    #[test]
    fn click_without_word_is_ignored() {
        let mut r = runner(3);
        r.load_words(&pool(&[word("sun", 1)]));
        start(&mut r);
        r.handle_input(key(KeyCode::Char(' ')));
        assert!(!r.clicked);
    }

    #[test]
    fn no_words_never_spawns() {
        let mut r = runner(3);
        r.load_words(&pool(&[]));
        start(&mut r);
        for _ in 0..1000 {
            r.update();
        }
        assert!(r.current.is_none());
        assert!(r.drain_events().is_empty());
    }

    #[test]
    fn review_mode_draws_from_older_levels() {
        let mut r = runner(3);
        let p = bundled_pool(4);
        r.load_words(&p);
        r.set_review_mode(true);
        let mut older = 0;
        for _ in 0..400 {
            let w = r.pick_word().unwrap();
            let bucket = p.review.iter().find(|(rw, _)| rw.id == w.id).unwrap().1;
            if bucket != Bucket::Current {
                older += 1;
            }
        }
        // Equal-sized levels: current carries 8.0 of 14.0 total weight
        assert!(older > 100 && older < 300, "older = {}", older);

        r.set_review_mode(false);
        for _ in 0..100 {
            let w = r.pick_word().unwrap();
            assert!(p.words.iter().any(|cw| cw.id == w.id));
        }
    }
}
