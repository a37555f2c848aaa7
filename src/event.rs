use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Tick deadline kept independently of input, so a held key cannot starve the games.
struct TickClock {
    rate: Duration,
    last_tick: Instant,
}

impl TickClock {
    fn new(rate: Duration, now: Instant) -> Self {
        Self { rate, last_tick: now }
    }

    /// How long input polling may block before the next tick is due.
    fn timeout(&self, now: Instant) -> Duration {
        self.rate.saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// True once per elapsed interval; restarts the interval when it fires.
    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.rate {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

/// Pumps terminal input on its own thread and emits a tick every interval.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut clock = TickClock::new(Duration::from_millis(tick_rate_ms), Instant::now());

        thread::spawn(move || loop {
            if event::poll(clock.timeout(Instant::now())).unwrap_or(false) {
                let sent = match event::read() {
                    Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(Event::Key(key)),
                    Ok(event::Event::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                    Ok(_) => Ok(()),
                    Err(e) => {
                        log::warn!("Terminal read failed: {}", e);
                        Ok(())
                    }
                };
                if sent.is_err() {
                    return;
                }
            }
            if clock.due(Instant::now()) && tx.send(Event::Tick).is_err() {
                return;
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_keep_coming_under_steady_input() {
        let start = Instant::now();
        let rate = Duration::from_millis(16);
        let mut clock = TickClock::new(rate, start);

        // A key every 5 ms for 100 ms still yields one tick per 16 ms
        let mut fired = 0;
        for step in 1..=20 {
            if clock.due(start + Duration::from_millis(step * 5)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 5);
    }

    #[test]
    fn timeout_shrinks_toward_the_deadline() {
        let start = Instant::now();
        let rate = Duration::from_millis(16);
        let clock = TickClock::new(rate, start);
        assert_eq!(clock.timeout(start), rate);
        assert_eq!(clock.timeout(start + Duration::from_millis(10)), Duration::from_millis(6));
        assert_eq!(clock.timeout(start + Duration::from_millis(40)), Duration::ZERO);
    }
}
