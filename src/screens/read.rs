use crossterm::event::{KeyCode, KeyEvent};

/// Ready-to-read: step through the level's sentences one word at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadAlong {
    pub sentence: usize,
    pub word: usize,
}

impl ReadAlong {
    pub fn reset(&mut self) {
        self.sentence = 0;
        self.word = 0;
    }

    /// Move the highlight on, wrapping to the next sentence and back to the first.
    pub fn advance(&mut self, sentences: &[String]) {
        let Some(current) = sentences.get(self.sentence) else {
            self.reset();
            return;
        };
        let words = current.split_whitespace().count();
        if self.word + 1 < words {
            self.word += 1;
            return;
        }
        self.word = 0;
        self.sentence = if self.sentence + 1 < sentences.len() { self.sentence + 1 } else { 0 };
    }

    pub fn handle_input(&mut self, key: KeyEvent, sentences: &[String]) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right => self.advance(sentences),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::key;

    #[test]
    fn walks_words_then_sentences_then_loops() {
        let sentences = vec!["The cat sat.".to_string(), "Go!".to_string()];
        let mut r = ReadAlong::default();
        r.advance(&sentences);
        assert_eq!((r.sentence, r.word), (0, 1));
        r.advance(&sentences);
        assert_eq!((r.sentence, r.word), (0, 2));
        r.advance(&sentences);
        assert_eq!((r.sentence, r.word), (1, 0));
        r.handle_input(key(KeyCode::Char(' ')), &sentences);
        assert_eq!((r.sentence, r.word), (0, 0));
    }

    #[test]
    fn no_sentences_stays_put() {
        let mut r = ReadAlong { sentence: 3, word: 2 };
        r.advance(&[]);
        assert_eq!(r, ReadAlong::default());
    }
}
