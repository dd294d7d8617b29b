//! Transient, self-dismissing messages shown by a step

use std::time::{Duration, Instant};

/// A message that disappears once its time-to-live has elapsed
#[derive(Debug, Clone)]
pub struct Notice {
    ttl: Duration,
    current: Option<(String, Instant)>,
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show `message`, replacing any message already visible
    pub fn show(&mut self, message: impl Into<String>) {
        self.current = Some((message.into(), Instant::now()));
    }

    /// Message visible at `now`, if any
    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now.saturating_duration_since(*shown) < self.ttl)
            .map(|(message, _)| message.as_str())
    }

    /// Message visible right now, if any
    pub fn visible(&self) -> Option<&str> {
        self.visible_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}
