//! Frame-advantage arithmetic.
//!
//! Combines a matched [`StartFrame`] with the recovery-frame state around the
//! connection. All intermediate arithmetic widens through `i64`: the inputs
//! mix `u32` recovery counts with signed deltas, and a wrap here would emit a
//! plausible-looking but wrong number.

use crate::frame::{FrameDataPoint, GameFrame, PlayerFrame, StartFrame};
use crate::{Side, Tick};

/// Computes the frame-data point for a resolved connection.
///
/// * `connected` — which player's attack landed.
/// * `start` — the matched start record for that attack.
/// * `connection_tick` — the tick the (first) hit registered on.
/// * `previous_attacker` — the attacker's snapshot from the tick before the
///   connection.
/// * `resolution` — the snapshot the result is computed against: the
///   connection frame itself for a single hit, the last buffered connection
///   frame for a string.
///
/// The result is oriented to the local player. When the local player
/// connects, `frame_advantage = startup − (recovery_at_start − opponent
/// recovery)`. When the opponent connects, the same quantity is negated and
/// `startup_frames` is reported as 0; startup is only meaningful for the
/// player who caused the connection. That asymmetry is deliberate and load
/// bearing for consumers.
///
/// Recovery reset: if the attacker's move id changed between
/// `previous_attacker` and `resolution`, the recovery baseline captured at
/// startup belongs to an animation cycle that no longer exists. The
/// advantage then falls back to the direct differential of both players'
/// current recovery frames, ignoring startup timing.
#[must_use]
pub fn frame_data(
    connected: Side,
    start: StartFrame,
    connection_tick: Tick,
    previous_attacker: &PlayerFrame,
    resolution: &GameFrame,
) -> FrameDataPoint {
    let attacker = resolution.player(connected);
    let opponent = resolution.player(connected.other());

    let startup = connection_tick - start.tick; // i64

    let advantage = if previous_attacker.move_id != attacker.move_id {
        // Recovery reset: a new recovery cycle began before resolution.
        i64::from(opponent.recovery_frames) - i64::from(attacker.recovery_frames)
    } else {
        let recovery_delta =
            i64::from(start.recovery_frames_at_start) - i64::from(opponent.recovery_frames);
        match connected {
            Side::P1 => startup - recovery_delta,
            Side::P2 => recovery_delta - startup,
        }
    };

    let startup_frames = match connected {
        Side::P1 => startup as i32,
        Side::P2 => 0,
    };

    FrameDataPoint {
        startup_frames,
        frame_advantage: advantage as i32,
    }
}

// #########
// # TESTS #
// #########
