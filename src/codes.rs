//! Closed enumerations over the game's numerically coded states.
//!
//! Game memory encodes player state as magic integers. Each table here is a
//! closed tagged enum with an explicit `Unknown(raw)` variant: a value the
//! table does not know is carried through as-is and classified as
//! undeterminable, never silently coerced to some default category. The
//! [`UnknownCodeLog`] keeps the warning for each distinct unknown value to a
//! single log line.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::frame::GameFrame;

/// What a player is trying to do this tick, as reported by the game's intent
/// field.
///
/// The raw values are the game's own; they are not contiguous.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentCode {
    /// Standing free, no committed action.
    Idle,
    /// Jab-class attack.
    Attack1,
    /// Mid-class attack.
    Attack3,
    /// Launcher-class attack.
    Attack5,
    /// String-opener attack class.
    Attack7,
    /// Input registered but not yet acted on.
    InputBuffering,
    /// Guarding.
    Block,
    /// Forward or backward movement.
    Walk,
    /// Single sidestep.
    SideStep,
    /// Frozen by the game (round transitions and similar).
    Stasis,
    /// An attack that connected with nothing.
    Whiff,
    /// Double sidestep.
    DoubleSideStep,
    /// Airborne while taking damage.
    Falling,
    /// Touching down while taking damage.
    Landing,
    /// Throw attempt started.
    GrabInit,
    /// Throw connected.
    GrabConnect,
    /// A value not present in the known table.
    Unknown(i32),
}

impl Default for IntentCode {
    fn default() -> Self {
        IntentCode::Idle
    }
}

impl IntentCode {
    /// Decodes a raw memory value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => IntentCode::Idle,
            1 => IntentCode::Attack1,
            3 => IntentCode::Attack3,
            5 => IntentCode::Attack5,
            7 => IntentCode::Attack7,
            10 => IntentCode::InputBuffering,
            11 => IntentCode::Block,
            12 => IntentCode::Walk,
            15 => IntentCode::SideStep,
            16 => IntentCode::Stasis,
            17 => IntentCode::Whiff,
            28 => IntentCode::DoubleSideStep,
            272 => IntentCode::Falling,
            528 => IntentCode::Landing,
            65539 => IntentCode::GrabInit,
            65546 => IntentCode::GrabConnect,
            other => IntentCode::Unknown(other),
        }
    }

    /// The raw memory value this code was decoded from.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            IntentCode::Idle => 0,
            IntentCode::Attack1 => 1,
            IntentCode::Attack3 => 3,
            IntentCode::Attack5 => 5,
            IntentCode::Attack7 => 7,
            IntentCode::InputBuffering => 10,
            IntentCode::Block => 11,
            IntentCode::Walk => 12,
            IntentCode::SideStep => 15,
            IntentCode::Stasis => 16,
            IntentCode::Whiff => 17,
            IntentCode::DoubleSideStep => 28,
            IntentCode::Falling => 272,
            IntentCode::Landing => 528,
            IntentCode::GrabInit => 65539,
            IntentCode::GrabConnect => 65546,
            IntentCode::Unknown(raw) => raw,
        }
    }

    /// Whether this intent is one of the attack classes.
    #[must_use]
    pub fn is_attack(self) -> bool {
        matches!(
            self,
            IntentCode::Attack1 | IntentCode::Attack3 | IntentCode::Attack5 | IntentCode::Attack7
        )
    }

    /// Coarse classification of this intent for the status stream.
    #[must_use]
    pub fn status(self) -> StatusCategory {
        match self {
            IntentCode::Attack1
            | IntentCode::Attack3
            | IntentCode::Attack5
            | IntentCode::Attack7 => StatusCategory::Attacking,
            IntentCode::Block => StatusCategory::Blocking,
            IntentCode::Walk | IntentCode::SideStep | IntentCode::DoubleSideStep => {
                StatusCategory::Movement
            }
            IntentCode::Falling | IntentCode::Landing => StatusCategory::TakingDamage,
            IntentCode::GrabInit | IntentCode::GrabConnect => StatusCategory::Grabbing,
            IntentCode::Idle
            | IntentCode::InputBuffering
            | IntentCode::Stasis
            | IntentCode::Whiff => StatusCategory::Neutral,
            IntentCode::Unknown(_) => StatusCategory::Undeterminable,
        }
    }
}

/// A move identifier.
///
/// Move ids are an open per-character namespace; the engine only ever asks
/// whether a move is the idle animation and whether two observations show the
/// same move, so this stays a transparent newtype rather than a closed table.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct MoveCode(i32);

impl MoveCode {
    /// The idle animation.
    pub const IDLE: MoveCode = MoveCode(0);

    /// Creates a `MoveCode` from a raw memory value.
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        MoveCode(raw)
    }

    /// The raw memory value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether this is the idle animation.
    #[inline]
    #[must_use]
    pub const fn is_idle(self) -> bool {
        self.0 == Self::IDLE.0
    }
}

/// Coarse animation state of a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateCode {
    /// Freely actionable.
    Neutral,
    /// Committed to a single discrete action.
    SingleAction,
    /// Inside a multi-hit string animation.
    StringAttack,
    /// Inside a continuous throw animation.
    ThrowAnimation,
    /// Knocked down.
    Downed,
    /// A value not present in the known table.
    Unknown(i32),
}

impl Default for StateCode {
    fn default() -> Self {
        StateCode::Neutral
    }
}

impl StateCode {
    /// Decodes a raw memory value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => StateCode::Neutral,
            1 => StateCode::SingleAction,
            2 => StateCode::StringAttack,
            3 => StateCode::ThrowAnimation,
            4 => StateCode::Downed,
            other => StateCode::Unknown(other),
        }
    }

    /// The raw memory value this code was decoded from.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            StateCode::Neutral => 0,
            StateCode::SingleAction => 1,
            StateCode::StringAttack => 2,
            StateCode::ThrowAnimation => 3,
            StateCode::Downed => 4,
            StateCode::Unknown(raw) => raw,
        }
    }

    /// Whether hits landed in this state belong to one ongoing multi-hit or
    /// continuous animation rather than a discrete attack.
    #[must_use]
    pub fn is_string_animation(self) -> bool {
        matches!(self, StateCode::StringAttack | StateCode::ThrowAnimation)
    }
}

/// Progress of the game's own string tracking for a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringStateCode {
    /// No string in progress.
    Inactive,
    /// A string is in progress.
    Active,
    /// The game reports the string as finished. This flag flickers while the
    /// closing animation settles, hence the debounce in
    /// [`strings`](crate::strings).
    Ended,
    /// A value not present in the known table.
    Unknown(i32),
}

impl Default for StringStateCode {
    fn default() -> Self {
        StringStateCode::Inactive
    }
}

impl StringStateCode {
    /// Decodes a raw memory value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => StringStateCode::Inactive,
            1 => StringStateCode::Active,
            2 => StringStateCode::Ended,
            other => StringStateCode::Unknown(other),
        }
    }

    /// The raw memory value this code was decoded from.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            StringStateCode::Inactive => 0,
            StringStateCode::Active => 1,
            StringStateCode::Ended => 2,
            StringStateCode::Unknown(raw) => raw,
        }
    }

    /// Whether the game reports the string as ended this tick.
    #[inline]
    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, StringStateCode::Ended)
    }
}

/// Kind of string the game reports for a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringTypeCode {
    /// Not in a string; a single discrete attack.
    Single,
    /// A multi-hit attack string.
    MultiHit,
    /// A throw sequence.
    Throw,
    /// A value not present in the known table.
    Unknown(i32),
}

impl Default for StringTypeCode {
    fn default() -> Self {
        StringTypeCode::Single
    }
}

impl StringTypeCode {
    /// Decodes a raw memory value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => StringTypeCode::Single,
            1 => StringTypeCode::MultiHit,
            2 => StringTypeCode::Throw,
            other => StringTypeCode::Unknown(other),
        }
    }

    /// The raw memory value this code was decoded from.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            StringTypeCode::Single => 0,
            StringTypeCode::MultiHit => 1,
            StringTypeCode::Throw => 2,
            StringTypeCode::Unknown(raw) => raw,
        }
    }
}

/// Coarse per-tick player status published to the sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    /// Freely actionable, nothing committed.
    Neutral,
    /// Executing an attack.
    Attacking,
    /// Guarding.
    Blocking,
    /// Walking or stepping.
    Movement,
    /// In hit- or fall-stun.
    TakingDamage,
    /// In a throw interaction.
    Grabbing,
    /// The underlying code is not in the known table.
    Undeterminable,
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StatusCategory::Neutral => "neutral",
            StatusCategory::Attacking => "attacking",
            StatusCategory::Blocking => "blocking",
            StatusCategory::Movement => "movement",
            StatusCategory::TakingDamage => "taking damage",
            StatusCategory::Grabbing => "grabbing",
            StatusCategory::Undeterminable => "undeterminable",
        };
        write!(f, "{}", label)
    }
}

/// Which code table an unknown raw value came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CodeTable {
    /// [`IntentCode`].
    Intent,
    /// [`StateCode`].
    State,
    /// [`StringStateCode`].
    StringState,
    /// [`StringTypeCode`].
    StringType,
}

/// Spam guard for unknown code warnings.
///
/// Each distinct `(table, raw)` pair is logged exactly once for the lifetime
/// of the log; at poll rate a persistent unknown value would otherwise emit
/// hundreds of identical lines per second.
#[derive(Debug, Default)]
pub struct UnknownCodeLog {
    seen: HashSet<(CodeTable, i32)>,
}

impl UnknownCodeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an unknown value; logs a warning only on first sight.
    /// Returns `true` if the value had not been seen before.
    pub fn note(&mut self, table: CodeTable, raw: i32) -> bool {
        let first = self.seen.insert((table, raw));
        if first {
            tracing::warn!(?table, raw, "unknown game state code");
        }
        first
    }

    /// Scans a frame for unknown code values on either player.
    pub fn observe_frame(&mut self, frame: &GameFrame) {
        for player in [&frame.p1, &frame.p2] {
            if let IntentCode::Unknown(raw) = player.intent {
                self.note(CodeTable::Intent, raw);
            }
            if let StateCode::Unknown(raw) = player.state_id {
                self.note(CodeTable::State, raw);
            }
            if let StringStateCode::Unknown(raw) = player.string_state {
                self.note(CodeTable::StringState, raw);
            }
            if let StringTypeCode::Unknown(raw) = player.string_type {
                self.note(CodeTable::StringType, raw);
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
    fn intent_raw_round_trips_for_known_values() {
        for raw in [0, 1, 3, 5, 7, 10, 11, 12, 15, 16, 17, 28, 272, 528, 65539, 65546] {
            assert_eq!(IntentCode::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn unknown_intent_keeps_raw_value() {
        let code = IntentCode::from_raw(424242);
        assert_eq!(code, IntentCode::Unknown(424242));
        assert_eq!(code.raw(), 424242);
        assert_eq!(code.status(), StatusCategory::Undeterminable);
    }

    #[test]
    fn attack_intents_classify_as_attacking() {
        for raw in [1, 3, 5, 7] {
            let code = IntentCode::from_raw(raw);
            assert!(code.is_attack());
            assert_eq!(code.status(), StatusCategory::Attacking);
        }
        assert!(!IntentCode::Block.is_attack());
    }

    #[test]
    fn string_animation_states() {
        assert!(StateCode::StringAttack.is_string_animation());
        assert!(StateCode::ThrowAnimation.is_string_animation());
        assert!(!StateCode::Neutral.is_string_animation());
        assert!(!StateCode::Unknown(99).is_string_animation());
    }

    #[test]
    fn move_code_idle() {
        assert!(MoveCode::IDLE.is_idle());
        assert!(!MoveCode::new(417).is_idle());
        assert_eq!(MoveCode::new(417).raw(), 417);
    }

    #[test]
    fn unknown_code_logged_once_per_distinct_value() {
        let mut log = UnknownCodeLog::new();
        assert!(log.note(CodeTable::Intent, 999));
        assert!(!log.note(CodeTable::Intent, 999));
        // Same raw value in a different table is a distinct entry.
        assert!(log.note(CodeTable::State, 999));
        assert!(log.note(CodeTable::Intent, 1000));
    }
}
