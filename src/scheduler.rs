//! Tick pacing and resynchronization decisions.
//!
//! The poller races the emulator's simulation clock. Polling at exactly the
//! game's tick rate guarantees missed ticks whenever the phases drift, so the
//! loop runs at twice that rate and expects to observe each tick roughly
//! twice. The decision of what to do with a fresh tick reading and the sleep
//! mechanics are kept apart from the engine so both can be tested without a
//! live source.

use web_time::{Duration, Instant};

use crate::Tick;

/// What the engine should do with the tick value it just read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// The game advanced as expected (or history is empty): read a frame.
    Read,
    /// The game has not advanced since the last recorded frame: skip this
    /// iteration entirely and go straight back to pacing.
    Skip,
    /// The live tick is neither the last recorded one nor its successor.
    /// Read anyway, best effort; the signed offset is reported for logging.
    DriftRead {
        /// `live − last`: negative when the clock appears to run backwards
        /// (match restart), greater than one when ticks were missed.
        frames_off: i64,
    },
}

/// Classifies a live tick reading against the most recent recorded tick.
#[must_use]
pub fn poll_decision(last: Option<Tick>, live: Tick) -> PollDecision {
    let Some(last) = last else {
        return PollDecision::Read;
    };
    match live - last {
        0 => PollDecision::Skip,
        1 => PollDecision::Read,
        frames_off => PollDecision::DriftRead { frames_off },
    }
}

/// Sleeps the remainder of each poll period in halved increments.
///
/// A single `thread::sleep` for the whole remainder is at the mercy of the
/// OS timer slop; spinning pegs a core. Sleeping half the remaining time and
/// re-checking converges on the deadline with bounded overshoot while the
/// thread stays off-CPU for almost the entire wait.
#[derive(Debug, Copy, Clone)]
pub struct TickPacer {
    period: Duration,
}

impl TickPacer {
    /// Creates a pacer with the given poll period.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    /// The configured poll period.
    #[inline]
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Blocks until one full period has elapsed since `iteration_start`.
    ///
    /// Returns immediately if the iteration's work already overran the
    /// period.
    pub fn pace(&self, iteration_start: Instant) {
        loop {
            let elapsed = iteration_start.elapsed();
            if elapsed >= self.period {
                return;
            }
            let remaining = self.period - elapsed;
            let step = remaining / 2;
            if step.is_zero() {
                std::thread::sleep(remaining);
            } else {
                std::thread::sleep(step);
            }
        }
    }
}

// #########
// # TESTS #
// #########

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_always_reads() {
        assert_eq!(poll_decision(None, Tick::new(0)), PollDecision::Read);
        assert_eq!(poll_decision(None, Tick::new(500)), PollDecision::Read);
    }

    #[test]
    fn same_tick_skips() {
        assert_eq!(
            poll_decision(Some(Tick::new(100)), Tick::new(100)),
            PollDecision::Skip
        );
    }

    #[test]
    fn successor_tick_reads() {
        assert_eq!(
            poll_decision(Some(Tick::new(100)), Tick::new(101)),
            PollDecision::Read
        );
    }

    #[test]
    fn skipped_ticks_drift_forward() {
        assert_eq!(
            poll_decision(Some(Tick::new(100)), Tick::new(104)),
            PollDecision::DriftRead { frames_off: 4 }
        );
    }

    #[test]
    fn match_restart_drifts_backward() {
        assert_eq!(
            poll_decision(Some(Tick::new(5000)), Tick::new(3)),
            PollDecision::DriftRead { frames_off: -4997 }
        );
    }

    #[test]
    fn pacer_waits_out_the_period() {
        let pacer = TickPacer::new(Duration::from_millis(5));
        let started = Instant::now();
        pacer.pace(started);
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn pacer_returns_promptly_when_overrun() {
        let pacer = TickPacer::new(Duration::from_millis(1));
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(2));
        let before = Instant::now();
        pacer.pace(started);
        assert!(before.elapsed() < Duration::from_millis(5));
    }
}
