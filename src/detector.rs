//! Per-tick classification of state transitions into attack-initiated and
//! hit-connected events.
//!
//! Detection always compares the two most recent history entries; a single
//! snapshot says nothing about edges. Both checks are plain functions over a
//! `(previous, current)` pair so they can be tested without an engine, and
//! [`AttackDetector`] adds the per-player start-record rings around them.

use crate::frame::{GameFrame, PlayerFrame, StartFrame};
use crate::history::BoundedHistory;
use crate::{Side, Tick};

/// Which player, if any, had an attack connect on this tick.
///
/// Simultaneous edges are impossible by construction (one snapshot per tick
/// drives one comparison), but if both flags were somehow observed rising on
/// the same tick, P1 takes precedence. That ordering is inherited from the
/// source data and has not been validated against real captures; it is a
/// documented choice, not a resolved one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionEvent {
    /// No new connection this tick.
    None,
    /// The local player's attack connected.
    P1,
    /// The opponent's attack connected.
    P2,
}

impl ConnectionEvent {
    /// The connecting side, if any.
    #[inline]
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            ConnectionEvent::None => None,
            ConnectionEvent::P1 => Some(Side::P1),
            ConnectionEvent::P2 => Some(Side::P2),
        }
    }
}

/// Whether a player began a new attack instance between two ticks.
///
/// Two signals, either of which is sufficient: the move id changed to a
/// non-idle animation, or the game bumped the attack sequence counter. The
/// counter catches follow-up attacks that reuse the coarse move id and would
/// otherwise be invisible.
#[must_use]
pub fn attack_initiated(prev: &PlayerFrame, curr: &PlayerFrame) -> bool {
    (!curr.move_id.is_idle() && prev.move_id != curr.move_id)
        || prev.attack_seq != curr.attack_seq
}

/// Edge-triggered connection detection over both players.
#[must_use]
pub fn connection_event(prev: &GameFrame, curr: &GameFrame) -> ConnectionEvent {
    if !prev.p1.connected && curr.p1.connected {
        return ConnectionEvent::P1;
    }
    if !prev.p2.connected && curr.p2.connected {
        return ConnectionEvent::P2;
    }
    ConnectionEvent::None
}

/// Per-player attack start tracking.
///
/// Holds one bounded [`StartFrame`] ring per player. Records go in when an
/// attack initiation is detected and come out when the startup resolver
/// matches a connection back to them; overflow silently drops the oldest.
#[derive(Debug)]
pub struct AttackDetector {
    p1_starts: BoundedHistory<StartFrame>,
    p2_starts: BoundedHistory<StartFrame>,
}

impl AttackDetector {
    /// Creates a detector whose per-player rings hold `ring_capacity`
    /// records. Returns `None` for capacities below 2.
    #[must_use]
    pub fn new(ring_capacity: usize) -> Option<Self> {
        Some(Self {
            p1_starts: BoundedHistory::with_capacity(ring_capacity)?,
            p2_starts: BoundedHistory::with_capacity(ring_capacity)?,
        })
    }

    /// Checks both players for a new attack instance and records a
    /// [`StartFrame`] for each initiation found.
    ///
    /// `head_index` is the history slot of `curr`, carried into the record
    /// for traceability.
    pub fn record_attacks(&mut self, prev: &GameFrame, curr: &GameFrame, head_index: usize) {
        for side in [Side::P1, Side::P2] {
            let prev_player = prev.player(side);
            let curr_player = curr.player(side);
            if attack_initiated(prev_player, curr_player) {
                let start = StartFrame {
                    recorded_at_index: head_index,
                    recovery_frames_at_start: curr_player.recovery_frames,
                    tick: curr.tick,
                    attack_seq: curr_player.attack_seq,
                };
                tracing::trace!(%side, tick = %curr.tick, attack_seq = start.attack_seq, "attack initiated");
                self.starts_mut(side).push(start);
            }
        }
    }

    /// The start-record ring for one player.
    #[must_use]
    pub fn starts_mut(&mut self, side: Side) -> &mut BoundedHistory<StartFrame> {
        match side {
            Side::P1 => &mut self.p1_starts,
            Side::P2 => &mut self.p2_starts,
        }
    }

    /// Read access to one player's start-record ring.
    #[must_use]
    pub fn starts(&self, side: Side) -> &BoundedHistory<StartFrame> {
        match side {
            Side::P1 => &self.p1_starts,
            Side::P2 => &self.p2_starts,
        }
    }

    /// Drops all pending start records for one player.
    ///
    /// A connection terminates the opposing player's pending attack window,
    /// so the engine calls this for the non-connecting side on every
    /// connection.
    pub fn clear_starts(&mut self, side: Side) {
        self.starts_mut(side).clear();
    }

    /// Drops all pending start records for both players (run restart).
    pub fn clear_all(&mut self) {
        self.p1_starts.clear();
        self.p2_starts.clear();
    }
}

/// The tick of the oldest pending start record for a player, used in logs.
#[must_use]
pub fn oldest_pending_tick(detector: &AttackDetector, side: Side) -> Option<Tick> {
    detector.starts(side).tail().map(|start| start.tick)
}

// #########
// # TESTS #
// #########

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codes::MoveCode;

    fn frame_at(tick: u32) -> GameFrame {
        GameFrame {
            tick: Tick::new(tick),
            ..GameFrame::default()
        }
    }

    #[test]
    fn idle_to_attack_fires_exactly_once() {
        let mut detector = AttackDetector::new(5).unwrap();
        let prev = frame_at(99);
        let mut curr = frame_at(100);
        curr.p1.move_id = MoveCode::new(10);
        curr.p1.attack_seq = 5;
        curr.p1.recovery_frames = 20;

        detector.record_attacks(&prev, &curr, 1);
        assert_eq!(detector.starts(Side::P1).len(), 1);
        assert_eq!(detector.starts(Side::P2).len(), 0);

        // Same move continuing on the next tick: no new record.
        let mut next = frame_at(101);
        next.p1 = curr.p1;
        detector.record_attacks(&curr, &next, 2);
        assert_eq!(detector.starts(Side::P1).len(), 1);

        let start = *detector.starts(Side::P1).head().unwrap();
        assert_eq!(start.tick, Tick::new(100));
        assert_eq!(start.attack_seq, 5);
        assert_eq!(start.recovery_frames_at_start, 20);
    }

    #[test]
    fn follow_up_with_same_move_id_fires_on_seq_bump() {
        let mut prev = frame_at(100);
        prev.p1.move_id = MoveCode::new(10);
        prev.p1.attack_seq = 5;
        let mut curr = frame_at(101);
        curr.p1.move_id = MoveCode::new(10);
        curr.p1.attack_seq = 6;

        assert!(attack_initiated(&prev.p1, &curr.p1));
    }

    #[test]
    fn returning_to_idle_does_not_fire() {
        let mut prev = frame_at(100);
        prev.p1.move_id = MoveCode::new(10);
        let curr = frame_at(101); // back to idle, same seq
        assert!(!attack_initiated(&prev.p1, &curr.p1));
    }

    #[test]
    fn connection_edge_triggers_per_player() {
        let prev = frame_at(105);
        let mut curr = frame_at(106);
        curr.p2.connected = true;
        assert_eq!(connection_event(&prev, &curr), ConnectionEvent::P2);

        // Held flag is not an edge.
        let mut next = frame_at(107);
        next.p2.connected = true;
        assert_eq!(connection_event(&curr, &next), ConnectionEvent::None);
    }

    #[test]
    fn simultaneous_edges_prefer_p1() {
        let prev = frame_at(105);
        let mut curr = frame_at(106);
        curr.p1.connected = true;
        curr.p2.connected = true;
        assert_eq!(connection_event(&prev, &curr), ConnectionEvent::P1);
    }

    #[test]
    fn start_ring_drops_oldest_on_overflow() {
        let mut detector = AttackDetector::new(2).unwrap();
        let mut prev = frame_at(0);
        for i in 1..=3u32 {
            let mut curr = frame_at(i);
            curr.p1.move_id = MoveCode::new(10);
            curr.p1.attack_seq = i as i32;
            detector.record_attacks(&prev, &curr, i as usize);
            prev = curr;
        }
        assert_eq!(detector.starts(Side::P1).len(), 2);
        assert_eq!(oldest_pending_tick(&detector, Side::P1), Some(Tick::new(2)));
    }

    #[test]
    fn clear_starts_only_touches_one_side() {
        let mut detector = AttackDetector::new(3).unwrap();
        let prev = frame_at(0);
        let mut curr = frame_at(1);
        curr.p1.move_id = MoveCode::new(10);
        curr.p1.attack_seq = 1;
        curr.p2.move_id = MoveCode::new(20);
        curr.p2.attack_seq = 1;
        detector.record_attacks(&prev, &curr, 0);

        detector.clear_starts(Side::P2);
        assert_eq!(detector.starts(Side::P1).len(), 1);
        assert_eq!(detector.starts(Side::P2).len(), 0);
    }
}
