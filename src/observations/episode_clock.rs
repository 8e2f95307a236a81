//! # Episode clock
//!
//! Zero-time reference of a tracking episode. The clock is anchored on the first accepted
//! sample and every later sample is stamped with the elapsed time since that anchor.
//!
//! Instants are [`hifitime::Epoch`] values, so callers can feed wall-clock time
//! (`Epoch::now()`) in production and synthetic instants in tests.
use hifitime::Epoch;

use crate::constants::Second;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeClock {
    start: Option<Epoch>,
}

impl EpisodeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor time zero at `now`. Has no effect when the clock is already started.
    pub fn start(&mut self, now: Epoch) {
        if self.start.is_none() {
            self.start = Some(now);
        }
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    /// Seconds elapsed since the anchor; `0.0` when the clock is not started.
    pub fn relative_time(&self, now: Epoch) -> Second {
        match self.start {
            Some(start) => (now - start).to_seconds(),
            None => 0.0,
        }
    }

    /// Clear the anchor so the next [`EpisodeClock::start`] re-anchors time zero.
    pub fn reset(&mut self) {
        self.start = None;
    }
}
