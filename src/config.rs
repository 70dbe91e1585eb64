//! Tunable parameters for the analysis engine.

use web_time::Duration;

/// Snapshots retained in the frame history ring.
///
/// Five seconds of game time at 60 fps; detection itself only ever looks two
/// frames back, the rest is headroom for consumers inspecting recent history.
pub const DEFAULT_FRAME_HISTORY_CAPACITY: usize = 300;

/// Pending attack-start records kept per player.
///
/// Attacks pend for tens of ticks at most before connecting or going stale;
/// five covers the fastest realistic initiation rate.
pub const DEFAULT_START_RING_CAPACITY: usize = 5;

/// Connection frames buffered per in-flight string.
pub const DEFAULT_STRING_RING_CAPACITY: usize = 16;

/// Consecutive string-ended ticks required before a string resolves.
pub const DEFAULT_STRING_DEBOUNCE_TICKS: usize = 3;

/// One simulation step of a 60 fps game.
pub const DEFAULT_NATIVE_TICK: Duration = Duration::from_nanos(16_666_667);

/// Configuration for an [`Analyser`](crate::Analyser).
///
/// The defaults target a 60 fps game and are what the engine was tuned
/// against; [`for_fps`](Self::for_fps) adjusts only the clock-dependent
/// field for games running at other rates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AnalyserConfig {
    /// Capacity of the frame history ring. Must be at least 2: detection
    /// compares consecutive snapshots.
    pub frame_history_capacity: usize,
    /// Capacity of each player's pending attack-start ring. Must be at
    /// least 2.
    pub start_ring_capacity: usize,
    /// Capacity of each string tracker's connection buffer. Must be at
    /// least 2.
    pub string_ring_capacity: usize,
    /// Consecutive ended ticks required to resolve a string. Must be at
    /// least 1.
    pub string_debounce_ticks: usize,
    /// The game's simulation period. The poll loop runs at twice this rate
    /// so phase drift between poller and game cannot hide a tick.
    pub native_tick: Duration,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            frame_history_capacity: DEFAULT_FRAME_HISTORY_CAPACITY,
            start_ring_capacity: DEFAULT_START_RING_CAPACITY,
            string_ring_capacity: DEFAULT_STRING_RING_CAPACITY,
            string_debounce_ticks: DEFAULT_STRING_DEBOUNCE_TICKS,
            native_tick: DEFAULT_NATIVE_TICK,
        }
    }
}

impl AnalyserConfig {
    /// The default configuration for a 60 fps game.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the native tick derived from a frame rate.
    ///
    /// A zero rate falls back to the 60 fps default.
    #[must_use]
    pub fn for_fps(fps: u32) -> Self {
        if fps == 0 {
            tracing::warn!("requested 0 fps, using the 60 fps default");
            return Self::default();
        }
        Self {
            native_tick: Duration::from_nanos(1_000_000_000 / u64::from(fps)),
            ..Self::default()
        }
    }

    /// The poll-loop period: half the native tick.
    #[inline]
    #[must_use]
    pub fn poll_period(&self) -> Duration {
        self.native_tick / 2
    }

    /// A human-readable description of the first invalid field, if any.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.frame_history_capacity < 2 {
            return Some(format!(
                "frame_history_capacity must be at least 2, got {}",
                self.frame_history_capacity
            ));
        }
        if self.start_ring_capacity < 2 {
            return Some(format!(
                "start_ring_capacity must be at least 2, got {}",
                self.start_ring_capacity
            ));
        }
        if self.string_ring_capacity < 2 {
            return Some(format!(
                "string_ring_capacity must be at least 2, got {}",
                self.string_ring_capacity
            ));
        }
        if self.string_debounce_ticks == 0 {
            return Some("string_debounce_ticks must be at least 1".to_owned());
        }
        if self.native_tick.is_zero() {
            return Some("native_tick must be non-zero".to_owned());
        }
        None
    }
}

// #########
// # TESTS #
// #########
