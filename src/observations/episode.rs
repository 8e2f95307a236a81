//! # Tracking episode
//!
//! An [`Episode`] owns the [`SampleSequence`] of one continuous tracking attempt together
//! with its [`EpisodeClock`]. Both are cleared in the same call, so the clock is started
//! exactly when the episode holds samples.
//!
//! Besides the raw bookkeeping, the episode applies the two ingestion rules of the
//! surrounding control loop:
//!
//! * **gap timeout** – if the previous sample arrived more than `gap_timeout` seconds ago,
//!   the episode is discarded and the new sample is dropped with it;
//! * **cooldown** – after a prediction cycle, samples arriving before the cooldown elapses
//!   are ignored.
use hifitime::{Duration, Epoch};
use nalgebra::Vector3;

use crate::constants::Second;
use crate::observations::episode_clock::EpisodeClock;
use crate::observations::{Sample, SampleSequence};

/// Outcome of offering a new position to an [`Episode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// The sample was recorded; carries the episode length after insertion.
    Accepted(usize),
    /// The gap since the previous sample exceeded the timeout; the episode was reset.
    GapReset,
    /// A prediction cycle just finished; the sample was ignored.
    CoolingDown,
}

#[derive(Debug, Clone)]
pub struct Episode {
    samples: SampleSequence,
    clock: EpisodeClock,
    gap_timeout: Second,
    last_arrival: Option<Epoch>,
    cooldown_until: Option<Epoch>,
}

impl Episode {
    pub fn new(gap_timeout: Second) -> Self {
        Episode {
            samples: SampleSequence::new(),
            clock: EpisodeClock::new(),
            gap_timeout,
            last_arrival: None,
            cooldown_until: None,
        }
    }

    /// Offer a position observed at `now` to the episode.
    ///
    /// Arguments
    /// -----------------
    /// * `position`: sensor-frame position, already accepted by the upstream validity filter.
    /// * `now`: arrival instant of the observation.
    ///
    /// Return
    /// ----------
    /// * [`Admission::Accepted`] with the new length when the sample was recorded, otherwise the
    ///   reason it was dropped.
    pub fn offer(&mut self, position: Vector3<f64>, now: Epoch) -> Admission {
        if let Some(until) = self.cooldown_until {
            if now < until {
                return Admission::CoolingDown;
            }
            self.cooldown_until = None;
        }

        let previous = self.last_arrival.replace(now);
        if let Some(previous) = previous {
            if (now - previous).to_seconds() > self.gap_timeout {
                self.reset();
                return Admission::GapReset;
            }
        }

        self.clock.start(now);
        let time = self.clock.relative_time(now);
        self.samples.push(Sample::new(position, time));
        Admission::Accepted(self.samples.len())
    }

    /// Ignore every sample offered before `now + duration`.
    pub fn begin_cooldown(&mut self, now: Epoch, duration: Second) {
        if duration > 0.0 {
            self.cooldown_until = Some(now + Duration::from_seconds(duration));
        }
    }

    pub fn is_cooling_down(&self, now: Epoch) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Clear samples, timestamps and the clock anchor together.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.clock.reset();
    }

    pub fn samples(&self) -> &SampleSequence {
        &self.samples
    }

    pub fn clock(&self) -> &EpisodeClock {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
