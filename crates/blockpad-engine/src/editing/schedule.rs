//! Timing helpers for history capture and autosave.
//!
//! Both types are driven by caller-supplied instants so the event loop owns
//! the clock and tests can step time explicitly.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(2000);

/// Fires once after input has been quiet for the configured period.
///
/// Every `touch` restarts the quiet period, so a burst of edits collapses
/// into a single history record.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_touch: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_touch: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_touch = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_touch.is_some()
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_touch {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                self.last_touch = None;
                true
            }
            _ => false,
        }
    }

    /// Fire immediately if anything is pending.
    pub fn flush(&mut self) -> bool {
        self.last_touch.take().is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Fixed-interval tick for persisting the working document.
#[derive(Debug, Clone)]
pub struct AutosaveClock {
    interval: Duration,
    last: Option<Instant>,
}

impl AutosaveClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first call starts the clock and is never due.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            None => {
                self.last = Some(now);
                false
            }
            Some(at) if now.saturating_duration_since(at) >= self.interval => {
                self.last = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

impl Default for AutosaveClock {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL)
    }
}
