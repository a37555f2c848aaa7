use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{Word, WordPool};
use crate::games::{ticks, Canvas, Game, GameEvent};

const CHARACTER_W: f32 = 3.0;
const BUILDING_W: f32 = 10.0;
const BUILDING_H: usize = 6;
const BUILDING_HEALTH: u32 = 3;
const BASE_SPEED: f32 = 0.25;
const FAST_SPEED: f32 = 0.6;
/// Queue length at which the character hurries
const FAST_QUEUE: usize = 3;
const ALIGN_TOLERANCE: f32 = 0.7;
const ATTACK_TICKS: u64 = ticks(500);

#[derive(Clone)]
struct Building {
    /// Position among the level's words; fixes the spacing and identifies the building
    slot: usize,
    word: Word,
    health: u32,
}

pub struct Rampage {
    buildings: Vec<Building>,
    /// Building slots waiting to be attacked, oldest first
    queue: VecDeque<usize>,
    character_x: f32,
    moving_right: bool,
    attack_timer: u64,
    cursor: usize,
    words: Vec<Word>,
    level_name: String,
    destroyed: u32,
    complete: bool,
    tick: u64,
    events: Vec<GameEvent>,
    field_width: f32,
}

impl Rampage {
    pub fn new() -> Self {
        Self {
            buildings: Vec::new(),
            queue: VecDeque::new(),
            character_x: 0.0,
            moving_right: true,
            attack_timer: 0,
            cursor: 0,
            words: Vec::new(),
            level_name: String::new(),
            destroyed: 0,
            complete: false,
            tick: 0,
            events: Vec::new(),
            field_width: 80.0,
        }
    }

    fn building_x(&self, slot: usize) -> f32 {
        let n = self.words.len() as f32;
        (slot as f32 + 1.0) * self.field_width / (n + 1.0) - BUILDING_W / 2.0
    }

    /// Where the character stands to attack a building.
    fn attack_x(&self, slot: usize) -> f32 {
        self.building_x(slot).clamp(0.0, self.max_x())
    }

    fn max_x(&self) -> f32 {
        (self.field_width - CHARACTER_W).max(0.0)
    }

    fn speed(&self) -> f32 {
        if self.queue.len() >= FAST_QUEUE {
            FAST_SPEED
        } else {
            BASE_SPEED
        }
    }

    fn enqueue(&mut self, slot: usize) {
        if self.buildings.iter().any(|b| b.slot == slot) && !self.queue.contains(&slot) {
            self.queue.push_back(slot);
        }
    }

    fn enqueue_cursor(&mut self) {
        if let Some(slot) = self.buildings.get(self.cursor).map(|b| b.slot) {
            self.enqueue(slot);
        }
    }

    fn apply_damage(&mut self, slot: usize) {
        self.queue.retain(|q| *q != slot);
        let Some(idx) = self.buildings.iter().position(|b| b.slot == slot) else { return };
        let b = &mut self.buildings[idx];
        b.health = b.health.saturating_sub(1);
        if b.health > 0 {
            return;
        }
        let b = self.buildings.remove(idx);
        log::debug!("Rampage destroyed {:?}", b.word.word);
        self.destroyed += 1;
        self.events.push(GameEvent::WordRead(b.word));
        if self.cursor >= self.buildings.len() {
            self.cursor = self.buildings.len().saturating_sub(1);
        }
        if self.buildings.is_empty() {
            log::info!("Rampage cleared {}", self.level_name);
            self.complete = true;
            self.events.push(GameEvent::RoundComplete);
        }
    }

    fn walk(&mut self) {
        let step = if self.moving_right { self.speed() } else { -self.speed() };
        let new_x = self.character_x + step;
        if new_x > self.max_x() {
            self.character_x = self.max_x();
            self.moving_right = false;
            return;
        }
        if new_x < 0.0 {
            self.character_x = 0.0;
            self.moving_right = true;
            return;
        }

        if let Some(&head) = self.queue.front() {
            if self.buildings.iter().any(|b| b.slot == head) {
                let target = self.attack_x(head);
                if (new_x - target).abs() < ALIGN_TOLERANCE {
                    self.character_x = target;
                    self.attack_timer = ATTACK_TICKS;
                    return;
                }
            }
        }
        self.character_x = new_x;
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let sky = Color::Rgb(30, 20, 45);
        let mut canvas = Canvas::new(width, height, Style::default().bg(sky));
        let ground = height.saturating_sub(1);
        canvas.fill_row(ground, '▀', Style::default().fg(Color::Rgb(90, 70, 50)).bg(Color::Rgb(50, 40, 30)));

        for (i, b) in self.buildings.iter().enumerate() {
            let x = self.building_x(b.slot).round() as i32;
            let top = ground as i32 - BUILDING_H as i32;
            let queued = self.queue.iter().position(|q| *q == b.slot);
            let wall = match b.health {
                3 => Color::Rgb(110, 110, 140),
                2 => Color::Rgb(140, 110, 90),
                _ => Color::Rgb(150, 80, 70),
            };
            let wall_style = Style::default().fg(Color::Rgb(255, 230, 120)).bg(wall);
            for row in 0..BUILDING_H as i32 {
                let pattern: String = (0..BUILDING_W as usize)
                    .map(|c| {
                        let cracked = (c as u32 + row as u32 * 3) % 5 < BUILDING_HEALTH - b.health;
                        if cracked {
                            '╳'
                        } else if row % 2 == 1 && c % 3 == 1 {
                            '▪'
                        } else {
                            ' '
                        }
                    })
                    .collect();
                canvas.text(x, top + row, &pattern, wall_style);
            }

            let label_style = if i == self.cursor {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(120, 220, 255)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(20, 20, 20)).bg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
            };
            let label: String = b.word.word.chars().take(BUILDING_W as usize).collect();
            canvas.text(x, top - 1, &label, label_style);
            let marker = match queued {
                Some(pos) => format!("{}⚑{}", i + 1, pos + 1),
                None => format!("{}", i + 1),
            };
            canvas.text(x, top - 2, &marker, Style::default().fg(Color::Rgb(160, 160, 200)).bg(sky));
        }

        // The character, mid-leap while attacking
        let cx = self.character_x.round() as i32;
        let lift = if self.attack_timer > 0 { 2 } else { 0 };
        let base = ground as i32 - 3 - lift;
        let style = Style::default().fg(Color::Rgb(120, 255, 120)).bg(sky).add_modifier(Modifier::BOLD);
        let arms = if self.attack_timer > 0 {
            "\\O/"
        } else if self.moving_right {
            " O>"
        } else {
            "<O "
        };
        canvas.text(cx, base, arms, style);
        canvas.text(cx, base + 1, "/█\\", style);
        let legs = if (self.tick / 8) % 2 == 0 || self.attack_timer > 0 { "/ \\" } else { " ┃ " };
        canvas.text(cx, base + 2, legs, style);

        canvas.into_lines()
    }
}

impl Game for Rampage {
    fn update(&mut self) {
        if self.complete {
            return;
        }
        self.tick += 1;
        if self.attack_timer > 0 {
            self.attack_timer -= 1;
            if self.attack_timer == 0 {
                if let Some(head) = self.queue.front().copied() {
                    self.apply_damage(head);
                }
            }
            return;
        }
        self.walk();
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if self.complete {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R')) {
                self.reset();
            }
            return;
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor + 1 < self.buildings.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.enqueue_cursor(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as u8 - b'1') as usize;
                if idx < self.buildings.len() {
                    self.cursor = idx;
                    self.enqueue_cursor();
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(255, 140, 60)))
            .title(" 🦖 Word Rampage ")
            .title_style(Style::default().fg(Color::Rgb(255, 170, 90)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status
                Constraint::Min(12),   // City
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let new_fw = chunks[1].width as f32;
        if (new_fw - self.field_width).abs() > 1.0 {
            self.character_x *= new_fw / self.field_width;
            self.field_width = new_fw;
            self.character_x = self.character_x.clamp(0.0, self.max_x());
        }

        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.level_name), Style::default().fg(Color::Rgb(200, 120, 255))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Smashed: {}/{} ", self.destroyed, self.words.len()), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Queue: {}{}", self.queue.len(), if self.queue.len() >= FAST_QUEUE { " ⚡" } else { "" }),
                Style::default().fg(Color::Cyan),
            ),
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

        let help = if self.complete {
            Line::from(vec![
                Span::styled(" 🎉 City cleared! ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled("ENTER to rebuild, Esc for menu", Style::default().fg(Color::Gray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" ←→ Pick building ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("ENTER/1-9 Read it & smash ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Menu", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.buildings = self
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| Building {
                slot: i,
                word: w.clone(),
                health: BUILDING_HEALTH,
            })
            .collect();
        self.queue.clear();
        self.character_x = 0.0;
        self.moving_right = true;
        self.attack_timer = 0;
        self.cursor = 0;
        self.destroyed = 0;
        self.complete = false;
        self.tick = 0;
    }

    fn get_score(&self) -> u32 {
        self.destroyed
    }

    fn is_game_over(&self) -> bool {
        self.complete
    }

    fn load_words(&mut self, pool: &WordPool) {
        self.words = pool.words.clone();
        self.level_name = pool.level_name.clone();
        self.reset();
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{key, pool, word};

    fn rampage(words: &[Word]) -> Rampage {
        let mut r = Rampage::new();
        r.load_words(&pool(words));
        r
    }

    fn run(r: &mut Rampage, n: usize) {
        for _ in 0..n {
            r.update();
        }
    }

    #[test]
    fn buildings_are_evenly_spaced() {
        let r = rampage(&[word("a", 1), word("b", 1), word("c", 1)]);
        assert_eq!(r.buildings.len(), 3);
        assert!(r.buildings.iter().all(|b| b.health == BUILDING_HEALTH));
        // Width 80 over 4 gaps: centers at 20, 40, 60
        assert_eq!(r.building_x(0), 15.0);
        assert_eq!(r.building_x(1), 35.0);
        assert_eq!(r.building_x(2), 55.0);
    }

    #[test]
    fn walks_and_turns_at_the_edges() {
        let mut r = rampage(&[word("a", 1)]);
        run(&mut r, 4);
        assert_eq!(r.character_x, 1.0);
        r.character_x = r.max_x() - 0.1;
        r.update();
        assert_eq!(r.character_x, r.max_x());
        assert!(!r.moving_right);
        r.update();
        assert!(r.character_x < r.max_x());
    }

    #[test]
    fn queue_has_no_duplicates_and_speeds_up() {
        let mut r = rampage(&[word("a", 1), word("b", 1), word("c", 1), word("d", 1)]);
        r.handle_input(key(KeyCode::Enter));
        r.handle_input(key(KeyCode::Enter));
        assert_eq!(r.queue.len(), 1);
        assert_eq!(r.speed(), BASE_SPEED);
        r.handle_input(key(KeyCode::Char('2')));
        r.handle_input(key(KeyCode::Char('3')));
        assert_eq!(r.queue, VecDeque::from(vec![0, 1, 2]));
        assert_eq!(r.speed(), FAST_SPEED);
        // Out of range digit does nothing
        r.handle_input(key(KeyCode::Char('9')));
        assert_eq!(r.queue.len(), 3);
    }

    #[test]
    fn three_attacks_destroy_a_building() {
        let mut r = rampage(&[word("a", 1), word("b", 1)]);
        for hit in 1..=BUILDING_HEALTH {
            r.handle_input(key(KeyCode::Char('2')));
            let mut attacked = false;
            for _ in 0..2000 {
                r.update();
                if r.attack_timer > 0 {
                    attacked = true;
                    assert_eq!(r.character_x, r.attack_x(1));
                }
                if r.queue.is_empty() {
                    break;
                }
            }
            assert!(attacked);
            if hit < BUILDING_HEALTH {
                assert_eq!(r.buildings[1].health, BUILDING_HEALTH - hit);
                assert!(r.drain_events().is_empty());
            }
        }
        assert_eq!(r.buildings.len(), 1);
        assert_eq!(r.drain_events(), vec![GameEvent::WordRead(word("b", 1))]);
        assert!(!r.is_game_over());
    }

    #[test]
    fn clearing_the_city_completes_the_round() {
        let mut r = rampage(&[word("a", 1)]);
        for _ in 0..BUILDING_HEALTH {
            r.handle_input(key(KeyCode::Enter));
            for _ in 0..2000 {
                r.update();
                if r.queue.is_empty() {
                    break;
                }
            }
        }
        assert!(r.is_game_over());
        assert_eq!(r.get_score(), 1);
        assert_eq!(
            r.drain_events(),
            vec![GameEvent::WordRead(word("a", 1)), GameEvent::RoundComplete]
        );
        // Frozen until restarted
        let x = r.character_x;
        run(&mut r, 10);
        assert_eq!(r.character_x, x);
        r.handle_input(key(KeyCode::Enter));
        assert!(!r.is_game_over());
        assert_eq!(r.buildings.len(), 1);
    }
}
