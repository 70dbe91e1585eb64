//! Value types for per-tick snapshots and derived event records.

use serde::{Deserialize, Serialize};

use crate::codes::{IntentCode, MoveCode, StateCode, StringStateCode, StringTypeCode};
use crate::{Side, Tick};

/// In-world coordinates of a player.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Lateral axis.
    pub x: f32,
    /// Vertical axis. Ignored for distance purposes.
    pub y: f32,
    /// Depth axis.
    pub z: f32,
}

/// One player's animation state at a single tick, as read from game memory.
///
/// Everything here is a raw observation; nothing is derived. The fields are
/// read non-atomically by the source, but the source contract guarantees the
/// struct arrives whole or not at all.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerFrame {
    /// Ticks since the player last took an action.
    pub frames_since_last_action: u32,
    /// Ticks remaining before the current animation ends and free action
    /// resumes.
    pub recovery_frames: u32,
    /// Whether one of this player's attacks is registering on the opponent
    /// (hit or block) this tick.
    pub connected: bool,
    /// What the player is trying to do.
    pub intent: IntentCode,
    /// Current move animation.
    pub move_id: MoveCode,
    /// Coarse animation state.
    pub state_id: StateCode,
    /// The game's own string-progress flag.
    pub string_state: StringStateCode,
    /// Kind of string, when one is in progress.
    pub string_type: StringTypeCode,
    /// In-world position.
    pub position: Position,
    /// Monotonically increasing counter the game bumps whenever a new attack
    /// instance begins. The sole reliable correlation key across ticks;
    /// tick arithmetic is not, because ticks may be skipped.
    pub attack_seq: i32,
}

/// A dual-player snapshot for a single tick.
///
/// `p1` is always the locally tracked player; the source normalizes sides
/// before the frame reaches the engine.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameFrame {
    /// The game's own frame counter at the time of the read.
    pub tick: Tick,
    /// The locally tracked player.
    pub p1: PlayerFrame,
    /// The opposing player.
    pub p2: PlayerFrame,
}

impl GameFrame {
    /// The snapshot for one side.
    #[inline]
    #[must_use]
    pub fn player(&self, side: Side) -> &PlayerFrame {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }

    /// Inter-player distance in the game's display units.
    ///
    /// Planar distance over x/z; the vertical axis is ignored, and the raw
    /// world units are scaled down by 1000 to match what the game shows.
    #[must_use]
    pub fn distance(&self) -> f32 {
        let dx = self.p1.position.x - self.p2.position.x;
        let dz = self.p1.position.z - self.p2.position.z;
        (dx * dx + dz * dz).sqrt() / 1000.0
    }
}

/// Record of an attack initiation, created by the detector and consumed
/// (popped) by the startup resolver.
///
/// Lives in a small bounded per-player ring; when a player starts attacks
/// faster than connections resolve them, the oldest records are silently
/// discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StartFrame {
    /// Absolute history-buffer slot of the snapshot that triggered this
    /// record. Only valid while that snapshot is still live.
    pub recorded_at_index: usize,
    /// The attacker's recovery frames at the initiation tick; the baseline
    /// for the frame-advantage arithmetic.
    pub recovery_frames_at_start: u32,
    /// Game tick at initiation.
    pub tick: Tick,
    /// The attack sequence value at initiation; connections are matched back
    /// to starts through this counter alone.
    pub attack_seq: i32,
}

/// A computed frame-data result, reported from the local player's
/// perspective.
///
/// `startup_frames` is only meaningful for the player who caused the
/// connection: when the remote player's attack connects it is reported as 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameDataPoint {
    /// Ticks between the attack's initiation and its connecting tick;
    /// 0 when the opponent caused the connection.
    pub startup_frames: i32,
    /// Net ticks by which the local player can act before the opponent,
    /// following the connection.
    pub frame_advantage: i32,
}

#[cfg(feature = "json")]
impl FrameDataPoint {
    /// Serializes this data point to a compact JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes this data point to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for FrameDataPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "startup frames: {}, frame advantage: {}",
            self.startup_frames, self.frame_advantage
        )
    }
}

// #########
// # TESTS #
// #########
