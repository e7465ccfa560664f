//! Debounced resync scheduling.
//!
//! A resync rebuilds the mirror tree and re-serializes the document. Bursts
//! of mutations collapse into one: every request supersedes the pending one
//! and pushes the due time out to `now + delay`. Time is supplied by the
//! caller; the scheduler never reads a clock.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResyncScheduler {
    delay: Duration,
    due: Option<Duration>,
}

impl ResyncScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule a resync, replacing any pending one
    pub fn request(&mut self, now: Duration) {
        self.due = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Duration> {
        self.due
    }

    /// Consume the pending resync if it is due at `now`
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending resync regardless of its due time
    pub fn flush(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }
}

impl Default for ResyncScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
