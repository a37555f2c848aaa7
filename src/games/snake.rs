use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{Word, WordPool};
use crate::games::{ticks, word_parts_line, Canvas, Game, GameEvent};
use crate::sampling::{pick_uniform, pick_weighted, BucketWeights};

const GRID_SIZE: i32 = 6;
const START_HEAD: (i32, i32) = (3, 3);
const START_FOOD: (i32, i32) = (5, 0);
const MOVE_TICKS: u64 = ticks(300);
const WORD_TIMEOUT: u64 = ticks(5000);
const CELL_W: usize = 4;
const CELL_H: usize = 2;

#[derive(Clone, Copy, PartialEq, Debug)]
enum State {
    Waiting,
    Moving,
    /// Too slow: the snake crawls a single step
    Timeout,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn step(self, (x, y): (i32, i32)) -> (i32, i32) {
        match self {
            Heading::Up => (x, y - 1),
            Heading::Down => (x, y + 1),
            Heading::Left => (x - 1, y),
            Heading::Right => (x + 1, y),
        }
    }
}

pub struct Snake {
    head: (i32, i32),
    food: (i32, i32),
    heading: Heading,
    state: State,
    /// Moves still owed for the current word
    queue: u32,
    timer: u64,
    current: Option<Word>,
    started: bool,
    words: Vec<Word>,
    pool: WordPool,
    weights: BucketWeights,
    review_mode: bool,
    score: u32,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Snake {
    pub fn new(weights: BucketWeights) -> Self {
        Self::with_rng(weights, StdRng::from_entropy())
    }

    fn with_rng(weights: BucketWeights, rng: StdRng) -> Self {
        Self {
            head: START_HEAD,
            food: START_FOOD,
            heading: Heading::Right,
            state: State::Waiting,
            queue: 0,
            timer: 0,
            current: None,
            started: false,
            words: Vec::new(),
            pool: WordPool::default(),
            weights,
            review_mode: false,
            score: 0,
            events: Vec::new(),
            rng,
        }
    }

    fn spawn_word(&mut self) {
        self.current = if self.review_mode && !self.pool.review.is_empty() {
            pick_weighted(&self.pool.review, &self.weights, &mut self.rng).cloned()
        } else {
            pick_uniform(&self.words, &mut self.rng).cloned()
        };
        self.state = State::Waiting;
        self.timer = 0;
    }

    fn spawn_food(&mut self) {
        loop {
            let pos = (self.rng.gen_range(0..GRID_SIZE), self.rng.gen_range(0..GRID_SIZE));
            if pos != self.head {
                self.food = pos;
                return;
            }
        }
    }

    /// Greedy step toward the food, keeping the current heading while it still helps.
    fn next_move(&mut self) -> (i32, i32) {
        let dx = self.food.0 - self.head.0;
        let dy = self.food.1 - self.head.1;
        let keep = match self.heading {
            Heading::Right => dx > 0,
            Heading::Left => dx < 0,
            Heading::Up => dy < 0,
            Heading::Down => dy > 0,
        };
        if !keep {
            self.heading = if dx.abs() > dy.abs() {
                if dx > 0 {
                    Heading::Right
                } else {
                    Heading::Left
                }
            } else if dy < 0 {
                Heading::Up
            } else {
                Heading::Down
            };
        }
        let (x, y) = self.heading.step(self.head);
        (x.clamp(0, GRID_SIZE - 1), y.clamp(0, GRID_SIZE - 1))
    }

    fn move_snake(&mut self) {
        self.head = self.next_move();
        if self.head == self.food {
            self.score += 1;
            if let Some(word) = &self.current {
                log::debug!("Snake ate food on {:?}", word.word);
                self.events.push(GameEvent::WordRead(word.clone()));
            }
            self.spawn_food();
        }
    }

    fn render_grid(&self) -> Vec<Line<'static>> {
        let size = GRID_SIZE as usize;
        let mut canvas = Canvas::new(size * CELL_W, size * CELL_H, Style::default());
        for gy in 0..size {
            for gx in 0..size {
                let shade = if (gx + gy) % 2 == 0 { 28 } else { 36 };
                let mut style = Style::default().bg(Color::Rgb(shade, shade + 12, shade));
                let mut glyph = "    ";
                if (gx as i32, gy as i32) == self.head {
                    style = Style::default()
                        .bg(Color::Rgb(80, 200, 90))
                        .fg(Color::Rgb(10, 40, 10))
                        .add_modifier(Modifier::BOLD);
                    glyph = match self.heading {
                        Heading::Up => " ▲▲ ",
                        Heading::Down => " ▼▼ ",
                        Heading::Left => " ◀◀ ",
                        Heading::Right => " ▶▶ ",
                    };
                } else if (gx as i32, gy as i32) == self.food {
                    style = style.fg(Color::Rgb(255, 90, 90)).add_modifier(Modifier::BOLD);
                    glyph = " ● ";
                }
                let (x, y) = ((gx * CELL_W) as i32, (gy * CELL_H) as i32);
                canvas.text(x, y, "    ", style);
                canvas.text(x, y + 1, "    ", style);
                canvas.text(x, y, glyph, style);
            }
        }
        canvas.into_lines()
    }
}

impl Game for Snake {
    fn update(&mut self) {
        if !self.started {
            return;
        }
        match self.state {
            State::Waiting => {
                if self.current.is_none() {
                    return;
                }
                self.timer += 1;
                if self.timer >= WORD_TIMEOUT {
                    if let Some(word) = &self.current {
                        log::debug!("Snake timed out on {:?}", word.word);
                        self.events.push(GameEvent::WordMissed(word.clone()));
                    }
                    self.state = State::Timeout;
                    self.queue = 1;
                    self.timer = 0;
                }
            }
            State::Moving | State::Timeout => {
                self.timer += 1;
                if self.timer < MOVE_TICKS {
                    return;
                }
                self.timer = 0;
                if self.queue > 0 {
                    self.queue -= 1;
                    self.move_snake();
                } else {
                    self.spawn_word();
                }
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state != State::Waiting {
                    return;
                }
                if !self.started {
                    self.started = true;
                    self.spawn_word();
                    return;
                }
                let Some(word) = &self.current else { return };
                self.queue = word.syllables();
                self.state = State::Moving;
                self.timer = 0;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.review_mode { " 🐍 Word Snake · review " } else { " 🐍 Word Snake " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 200, 90)))
            .title(title)
            .title_style(Style::default().fg(Color::Rgb(130, 230, 130)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let grid_h = (GRID_SIZE as usize * CELL_H) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),      // Status
                Constraint::Length(4),      // Word
                Constraint::Length(grid_h), // Grid
                Constraint::Min(0),
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let state_label = match self.state {
            State::Waiting => "Read the word!",
            State::Moving => "Moving...",
            State::Timeout => "Too slow!",
        };
        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.pool.level_name), Style::default().fg(Color::Rgb(200, 120, 255))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Moves: {} ", self.queue), Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(state_label, Style::default().fg(Color::Rgb(130, 230, 130))),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let word_lines = match (&self.current, self.started) {
            (_, false) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "[ Start ]",
                    Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(130, 230, 130)).add_modifier(Modifier::BOLD),
                )),
            ],
            (Some(word), true) => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  {}  ", word.word),
                        Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
                    )),
                ];
                if self.state == State::Timeout {
                    lines.push(word_parts_line(word));
                }
                lines
            }
            (None, true) => vec![
                Line::from(""),
                Line::from(Span::styled("No words available for this level!", Style::default().fg(Color::Red))),
            ],
        };
        frame.render_widget(Paragraph::new(word_lines).alignment(Alignment::Center), chunks[1]);

        // Center the board horizontally
        let grid_w = (GRID_SIZE as usize * CELL_W) as u16;
        let grid_area = Rect::new(
            chunks[2].x + chunks[2].width.saturating_sub(grid_w) / 2,
            chunks[2].y,
            grid_w.min(chunks[2].width),
            chunks[2].height,
        );
        frame.render_widget(Paragraph::new(self.render_grid()), grid_area);

        let help = Line::from(vec![
            Span::styled(" ENTER I read it ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Menu ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("R Restart", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[4]);
    }

    fn reset(&mut self) {
        self.head = START_HEAD;
        self.food = START_FOOD;
        self.heading = Heading::Right;
        self.state = State::Waiting;
        self.queue = 0;
        self.timer = 0;
        self.current = None;
        self.started = false;
        self.score = 0;
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
