//! Leading-edge rate limiting.

use std::time::{Duration, Instant};

/// A leading-edge throttle: the first call in a window fires
/// immediately, calls within the window are dropped, and the next call
/// after the window elapses fires again.
///
/// Time is supplied by the caller, so tests need no sleeping and the
/// reader loop stays the only clock owner.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Returns true if a call at `now` may proceed, and records it.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            },
        }
    }
}
