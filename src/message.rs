use std::time::{Duration, Instant};

/// A text notice shown for a fixed wall-clock duration, then hidden.
pub struct MessageBox {
    text: String,
    shown_at: Option<Instant>,
    duration: Duration,
}

impl MessageBox {
    pub fn new(duration: Duration) -> Self {
        Self { text: String::new(), shown_at: None, duration }
    }

    pub fn show(&mut self, text: &str) {
        self.text = text.to_string();
        self.shown_at = Some(Instant::now());
    }

    /// Called once per frame to expire a stale message.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        if let Some(shown_at) = self.shown_at {
            if now.duration_since(shown_at) >= self.duration {
                self.shown_at = None;
            }
        }
    }

    pub fn visible_text(&self) -> Option<&str> {
        self.shown_at.map(|_| self.text.as_str())
    }
}
