use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{Round, Word, WordPool};
use crate::games::{ticks, word_parts_line, Game, GameEvent};
use crate::sampling::pick_uniform;

const FEEDBACK_TICKS: u64 = ticks(1000);

#[derive(Clone, Copy, PartialEq, Debug)]
enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
struct Stats {
    correct: u32,
    total: u32,
}

impl Stats {
    fn accuracy(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.correct as f32 / self.total as f32) * 100.0).round() as u32
        }
    }
}

/// Flash-card round: every word of the level until each has been read once.
pub struct Quiz {
    round: Round,
    current: Option<Word>,
    score: u32,
    streak: u32,
    best_streak: u32,
    stats: Stats,
    feedback: Option<Feedback>,
    feedback_timer: u64,
    show_results: bool,
    level_name: String,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Quiz {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            round: Round::default(),
            current: None,
            score: 0,
            streak: 0,
            best_streak: 0,
            stats: Stats::default(),
            feedback: None,
            feedback_timer: 0,
            show_results: false,
            level_name: String::new(),
            events: Vec::new(),
            rng,
        }
    }

    /// Correct answers in the current round; this is what counts as a level high score.
    pub fn round_score(&self) -> u32 {
        self.stats.correct
    }

    /// The quiz score carries over between sessions.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn load_next_word(&mut self) {
        self.feedback = None;
        if self.round.all_completed() {
            self.current = None;
            if !self.show_results {
                self.show_results = true;
                log::info!(
                    "Quiz round finished: {}/{} correct",
                    self.stats.correct,
                    self.stats.total
                );
                self.events.push(GameEvent::RoundComplete);
            }
            return;
        }
        let remaining: Vec<Word> = self.round.remaining().into_iter().map(|g| g.word.clone()).collect();
        self.current = pick_uniform(&remaining, &mut self.rng).cloned();
    }

    fn answer(&mut self, correct: bool) {
        let Some(word) = self.current.clone() else { return };
        if self.feedback.is_some() {
            return;
        }
        self.stats.total += 1;
        if correct {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.stats.correct += 1;
            self.round.mark_completed(&word.id);
            self.feedback = Some(Feedback::Correct);
            self.events.push(GameEvent::WordRead(word));
        } else {
            self.streak = 0;
            self.feedback = Some(Feedback::Incorrect);
            self.events.push(GameEvent::WordMissed(word));
        }
        self.feedback_timer = FEEDBACK_TICKS;
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "🎉 Round complete!",
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Correct: {} / {}", self.stats.correct, self.stats.total)),
            Line::from(format!("Accuracy: {}%", self.stats.accuracy())),
            Line::from(format!("Best streak: {}", self.best_streak)),
            Line::from(format!("Total score: {}", self.score)),
            Line::from(""),
            Line::from(Span::styled(
                "ENTER to play again",
                Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

impl Game for Quiz {
    fn update(&mut self) {
        if self.feedback.is_none() {
            return;
        }
        self.feedback_timer = self.feedback_timer.saturating_sub(1);
        if self.feedback_timer == 0 {
            self.load_next_word();
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if self.show_results {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R')) {
                self.reset();
            }
            return;
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Right => self.answer(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Left => self.answer(false),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 200, 120)))
            .title(" 📖 Word Quiz ")
            .title_style(Style::default().fg(Color::Rgb(120, 230, 150)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score / streak
                Constraint::Min(9),    // Card
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(format!(" {} ", self.level_name), Style::default().fg(Color::Rgb(200, 120, 255))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🔥 Streak: {} ", self.streak), Style::default().fg(Color::Rgb(255, 140, 60))),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Left: {}/{}", self.round.remaining().len(), self.round.len()),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        if self.show_results {
            self.render_results(frame, chunks[1]);
        } else if let Some(word) = &self.current {
            let bg = match self.feedback {
                Some(Feedback::Correct) => Color::Rgb(20, 70, 35),
                Some(Feedback::Incorrect) => Color::Rgb(80, 25, 25),
                None => Color::Rgb(25, 25, 35),
            };
            let dots: String = (0..word.syllables()).map(|_| "● ").collect();
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    word.word.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(dots, Style::default().fg(Color::Rgb(255, 220, 80)))),
                Line::from(""),
            ];
            match self.feedback {
                Some(Feedback::Correct) => lines.push(Line::from(Span::styled(
                    "Correct!",
                    Style::default().fg(Color::Rgb(120, 230, 120)).add_modifier(Modifier::BOLD),
                ))),
                Some(Feedback::Incorrect) => {
                    lines.push(Line::from(Span::styled(
                        "Try Again!",
                        Style::default().fg(Color::Rgb(255, 110, 110)).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(word_parts_line(word));
                }
                None => {}
            }
            let card = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(bg));
            frame.render_widget(card, chunks[1]);
        } else if self.round.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                "No words available for this level!",
                Style::default().fg(Color::Red),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(msg, chunks[1]);
        }

        let help = Line::from(vec![
            Span::styled(" Y/→ I read it ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("N/← Not yet ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("R New round ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.round.reset();
        self.stats = Stats::default();
        self.streak = 0;
        self.show_results = false;
        self.feedback = None;
        self.feedback_timer = 0;
        self.load_next_word();
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.show_results
    }

    fn load_words(&mut self, pool: &WordPool) {
        self.round = Round::new(&pool.words);
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

    fn quiz(words: &[Word]) -> Quiz {
        let mut q = Quiz::with_rng(StdRng::seed_from_u64(5));
        q.load_words(&pool(words));
        q
    }

    fn settle(q: &mut Quiz) {
        for _ in 0..FEEDBACK_TICKS + 1 {
            q.update();
        }
    }

    #[test]
    fn every_word_once_then_results() {
        let words = vec![word("cat", 1), word("dog", 1), word("sun", 1)];
        let mut q = quiz(&words);
        q.set_score(10);
        let mut seen = Vec::new();
        for _ in 0..words.len() {
            let w = q.current.clone().unwrap();
            assert!(!seen.contains(&w.word), "{} offered twice", w.word);
            seen.push(w.word.clone());
            q.handle_input(key(KeyCode::Char('y')));
            settle(&mut q);
        }
        assert!(q.is_game_over());
        assert!(q.current.is_none());
        assert_eq!(q.get_score(), 13);
        assert_eq!(q.stats.accuracy(), 100);
        let events = q.drain_events();
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::WordRead(_))).count(), 3);
        assert_eq!(events.last(), Some(&GameEvent::RoundComplete));
    }

    #[test]
    fn wrong_answer_keeps_the_word_and_breaks_the_streak() {
        let mut q = quiz(&[word("cat", 1)]);
        q.handle_input(key(KeyCode::Char('y')));
        assert_eq!(q.streak, 1);
        q.reset();
        q.handle_input(key(KeyCode::Char('n')));
        assert_eq!(q.streak, 0);
        assert_eq!(q.round.remaining().len(), 1);
        settle(&mut q);
        assert_eq!(q.current.as_ref().map(|w| w.word.as_str()), Some("cat"));
        assert_eq!(q.stats, Stats { correct: 0, total: 1 });
    }

    #[test]
    fn answers_ignored_during_feedback() {
        let mut q = quiz(&[word("cat", 1), word("dog", 1)]);
        q.handle_input(key(KeyCode::Char('y')));
        q.handle_input(key(KeyCode::Char('y')));
        assert_eq!(q.get_score(), 1);
        assert_eq!(q.stats.total, 1);
    }

    #[test]
    fn reset_clears_round_but_keeps_score() {
        let mut q = quiz(&[word("cat", 1)]);
        q.handle_input(key(KeyCode::Char('y')));
        settle(&mut q);
        assert!(q.is_game_over());
        q.handle_input(key(KeyCode::Enter));
        assert!(!q.is_game_over());
        assert_eq!(q.get_score(), 1);
        assert_eq!(q.round.remaining().len(), 1);
        assert_eq!(q.stats, Stats::default());
    }

    #[test]
    fn empty_level_has_no_card() {
        let mut q = quiz(&[]);
        assert!(q.current.is_none());
        assert!(!q.is_game_over());
        q.handle_input(key(KeyCode::Char('y')));
        assert_eq!(q.get_score(), 0);
        assert!(q.drain_events().is_empty());
    }
}
