//! Matching a connection back to the attack that caused it.
//!
//! The match key is the game's attack sequence counter, taken from the frame
//! *immediately preceding* the connection tick. The connection tick itself is
//! unusable: a player can re-initiate an attack on the very tick their
//! previous attack connects, and the counter would already show the new
//! instance.

use crate::error::UnresolvedStartup;
use crate::frame::StartFrame;
use crate::history::BoundedHistory;
use crate::Side;

/// Pops start records oldest-first until one matches `wanted_seq`.
///
/// Non-matching records are stale (their attack never connected before a
/// newer one started); each is logged at debug level and discarded. If the
/// ring runs out without a match the player's tracking is left empty and an
/// [`UnresolvedStartup`] is returned; the caller logs it and skips the event.
pub fn resolve_startup(
    ring: &mut BoundedHistory<StartFrame>,
    wanted_seq: i32,
    side: Side,
) -> Result<StartFrame, UnresolvedStartup> {
    let mut discarded = 0;
    while !ring.is_empty() {
        let candidate = ring.pop();
        if candidate.attack_seq == wanted_seq {
            return Ok(candidate);
        }
        tracing::debug!(
            %side,
            stale_seq = candidate.attack_seq,
            wanted_seq,
            tick = %candidate.tick,
            "discarding stale start record"
        );
        discarded += 1;
    }
    Err(UnresolvedStartup {
        side,
        wanted_seq,
        discarded,
    })
}

// #########
// # TESTS #
// #########

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Tick;

    fn start(tick: u32, seq: i32) -> StartFrame {
        StartFrame {
            recorded_at_index: 0,
            recovery_frames_at_start: 20,
            tick: Tick::new(tick),
            attack_seq: seq,
        }
    }

    #[test]
    fn matches_record_with_wanted_seq() {
        let mut ring = BoundedHistory::with_capacity(5).unwrap();
        ring.push(start(100, 5));

        let resolved = resolve_startup(&mut ring, 5, Side::P1).unwrap();
        assert_eq!(resolved.tick, Tick::new(100));
        assert!(ring.is_empty());
    }

    #[test]
    fn stale_record_ahead_is_discarded_not_matched() {
        let mut ring = BoundedHistory::with_capacity(5).unwrap();
        ring.push(start(95, 4));
        ring.push(start(100, 5));

        let resolved = resolve_startup(&mut ring, 5, Side::P1).unwrap();
        assert_eq!(resolved.attack_seq, 5);
        assert_eq!(resolved.tick, Tick::new(100));
        assert!(ring.is_empty());
    }

    #[test]
    fn exhausted_ring_is_an_error() {
        let mut ring = BoundedHistory::with_capacity(5).unwrap();
        ring.push(start(95, 4));
        ring.push(start(96, 3));

        let err = resolve_startup(&mut ring, 5, Side::P2).unwrap_err();
        assert_eq!(err.side, Side::P2);
        assert_eq!(err.wanted_seq, 5);
        assert_eq!(err.discarded, 2);
        assert!(ring.is_empty());
    }

    #[test]
    fn later_records_survive_a_match() {
        let mut ring = BoundedHistory::with_capacity(5).unwrap();
        ring.push(start(100, 5));
        ring.push(start(106, 6));

        let resolved = resolve_startup(&mut ring, 5, Side::P1).unwrap();
        assert_eq!(resolved.attack_seq, 5);
        // The newer record is untouched and still pending.
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.head().unwrap().attack_seq, 6);
    }
}
