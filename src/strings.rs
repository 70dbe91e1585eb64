//! Aggregation of multi-hit strings into a single frame-data result.
//!
//! A hit landed mid-string must not be resolved on its own; the whole string
//! is one combo event. The tracker buffers connection frames while the
//! string runs, watches the game's string-ended flag, and only resolves once
//! that flag has held for three consecutive ticks. The flag flickers while
//! the closing animation settles, and trusting a single tick of it produces
//! split combos with nonsense advantage numbers.

use smallvec::SmallVec;

use crate::frame::{GameFrame, PlayerFrame, StartFrame};
use crate::history::BoundedHistory;
use crate::{Side, Tick};

/// Everything needed to compute frame data for a completed string.
#[derive(Debug, Clone, PartialEq)]
pub struct StringResolution {
    /// The player whose string landed.
    pub connected: Side,
    /// Start record of the attack that opened the string.
    pub start: StartFrame,
    /// Tick of the first buffered connection; startup attribution uses this.
    pub first_connection_tick: Tick,
    /// The attacker's snapshot from the tick before the first connection.
    pub previous_attacker: PlayerFrame,
    /// The last buffered connection frame; recovery and advantage
    /// attribution use this.
    pub resolution: GameFrame,
}

/// Start-of-string context captured when the tracker activates.
#[derive(Debug, Clone, Copy)]
struct Pending {
    start: StartFrame,
    previous_attacker: PlayerFrame,
}

/// Per-player string state machine.
///
/// Lifecycle: idle until [`begin`](Self::begin) is called with the string's
/// first connection, buffering while further connections arrive, debouncing
/// once the game reports the string ended, then emitting a
/// [`StringResolution`] from [`observe`](Self::observe) and returning to
/// idle. At most one unresolved string exists per player at a time.
#[derive(Debug)]
pub struct StringTracker {
    side: Side,
    /// How many consecutive ended ticks are required before resolving.
    debounce_ticks: usize,
    /// Buffered connection frames of the in-flight string, oldest first.
    connections: BoundedHistory<GameFrame>,
    /// Ticks of the current uninterrupted run of ended signals.
    ended_run: SmallVec<[Tick; 3]>,
    pending: Option<Pending>,
}

impl StringTracker {
    /// Creates an idle tracker for one player.
    ///
    /// `connection_capacity` bounds how many connection frames a single
    /// string may buffer; absurdly long strings silently drop their oldest
    /// hits. Returns `None` for capacities below 2 or a zero debounce.
    #[must_use]
    pub fn new(side: Side, connection_capacity: usize, debounce_ticks: usize) -> Option<Self> {
        if debounce_ticks == 0 {
            tracing::error!("string debounce must be at least 1 tick");
            return None;
        }
        Some(Self {
            side,
            debounce_ticks,
            connections: BoundedHistory::with_capacity(connection_capacity)?,
            ended_run: SmallVec::new(),
            pending: None,
        })
    }

    /// Whether a string is currently being tracked for this player.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of connection frames buffered for the in-flight string.
    #[inline]
    #[must_use]
    pub fn buffered_connections(&self) -> usize {
        self.connections.len()
    }

    /// Activates the tracker with the string's first connection.
    ///
    /// The startup record is resolved eagerly by the caller (the frame
    /// preceding the first connection is only cheaply reachable at that
    /// moment); the tracker carries it until resolution.
    pub fn begin(&mut self, start: StartFrame, previous_attacker: PlayerFrame, first: GameFrame) {
        debug_assert!(self.pending.is_none(), "string already active");
        tracing::debug!(side = %self.side, tick = %first.tick, "string opened");
        self.connections.clear();
        self.connections.push(first);
        self.ended_run.clear();
        self.pending = Some(Pending {
            start,
            previous_attacker,
        });
    }

    /// Buffers a subsequent connection of the in-flight string.
    pub fn buffer_connection(&mut self, frame: &GameFrame) {
        debug_assert!(self.pending.is_some(), "no string active");
        tracing::trace!(side = %self.side, tick = %frame.tick, "string hit buffered");
        self.connections.push(*frame);
    }

    /// Feeds the tracker the current tick's snapshot; returns a resolution
    /// once the ended signal has held long enough.
    ///
    /// The ended run only advances when ticks are strictly consecutive; a
    /// skipped tick or a flicker back to active resets the counter without
    /// touching the buffered connection frames.
    pub fn observe(&mut self, curr: &GameFrame) -> Option<StringResolution> {
        self.pending?;
        let player = curr.player(self.side);

        if !player.string_state.is_ended() {
            self.ended_run.clear();
            return None;
        }

        match self.ended_run.last() {
            Some(&last) if curr.tick - last == 1 => self.ended_run.push(curr.tick),
            Some(_) => {
                // Gap in the run; start counting again from this tick.
                self.ended_run.clear();
                self.ended_run.push(curr.tick);
            }
            None => self.ended_run.push(curr.tick),
        }

        if self.ended_run.len() < self.debounce_ticks {
            return None;
        }
        self.resolve()
    }

    /// Abandons any in-flight string (run restart).
    pub fn reset(&mut self) {
        self.pending = None;
        self.connections.clear();
        self.ended_run.clear();
    }

    fn resolve(&mut self) -> Option<StringResolution> {
        let pending = self.pending.take()?;
        let first = *self.connections.tail()?;
        let last = *self.connections.head()?;
        tracing::debug!(
            side = %self.side,
            first_tick = %first.tick,
            last_tick = %last.tick,
            hits = self.connections.len(),
            "string resolved"
        );
        let resolution = StringResolution {
            connected: self.side,
            start: pending.start,
            first_connection_tick: first.tick,
            previous_attacker: pending.previous_attacker,
            resolution: last,
        };
        self.connections.clear();
        self.ended_run.clear();
        Some(resolution)
    }
}

// #########
// # TESTS #
// #########
