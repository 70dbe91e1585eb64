//! Error taxonomy for the analysis engine.
//!
//! Errors split along the policy line described in the crate docs: anything
//! local to classification (unknown codes, an unresolvable startup record)
//! is absorbed and logged, while errors from the external memory source end
//! the current [`start`](crate::Analyser::start) run and are surfaced to the
//! caller, who owns the retry/backoff policy.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::Side;

/// Failure to attach to the game in the first place.
///
/// Returned by [`GameStateSource::init`](crate::GameStateSource::init). These
/// are not retryable by the engine itself; the caller decides whether to wait
/// for the target process and call `start` again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InitError {
    /// The emulator (or game) process could not be found.
    ProcessNotFound,
    /// The process was found but its memory layout is not one this source
    /// knows how to read.
    UnsupportedLayout {
        /// Further details on what did not match.
        info: String,
    },
    /// An OS-level failure while opening the memory interface.
    Io {
        /// A description of the underlying failure.
        context: String,
    },
}

impl Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::ProcessNotFound => {
                write!(f, "target game process not found")
            }
            InitError::UnsupportedLayout { info } => {
                write!(f, "unsupported game memory layout: {}", info)
            }
            InitError::Io { context } => {
                write!(f, "failed to open game memory: {}", context)
            }
        }
    }
}

impl Error for InitError {}

/// Which aggregate read operation failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReadField {
    /// The live game tick counter.
    Tick,
    /// A complete two-player frame snapshot.
    Frame,
    /// The side indicator for the locally tracked player.
    PlayerSide,
}

impl Display for ReadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadField::Tick => write!(f, "tick counter"),
            ReadField::Frame => write!(f, "frame snapshot"),
            ReadField::PlayerSide => write!(f, "player side"),
        }
    }
}

/// A single poll of the game's memory failed.
///
/// Fatal to the current `start` run, not to the process: the engine returns
/// it from `start` instead of retrying internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadError {
    /// Which read operation failed.
    pub field: ReadField,
    /// A description of the underlying failure.
    pub context: String,
}

impl ReadError {
    /// Creates a new `ReadError` for the given field.
    #[must_use]
    pub fn new(field: ReadField, context: impl Into<String>) -> Self {
        Self {
            field,
            context: context.into(),
        }
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read {}: {}", self.field, self.context)
    }
}

impl Error for ReadError {}

/// Errors returned by the engine control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The memory source could not be initialized.
    Init(InitError),
    /// A poll of the memory source failed mid-run.
    Read(ReadError),
    /// The engine was constructed with an unusable configuration.
    InvalidConfig {
        /// Further specifies what was invalid.
        info: String,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Init(err) => write!(f, "source initialization failed: {}", err),
            EngineError::Read(err) => write!(f, "source read failed: {}", err),
            EngineError::InvalidConfig { info } => {
                write!(f, "invalid configuration: {}", info)
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Init(err) => Some(err),
            EngineError::Read(err) => Some(err),
            EngineError::InvalidConfig { .. } => None,
        }
    }
}

impl From<InitError> for EngineError {
    fn from(err: InitError) -> Self {
        EngineError::Init(err)
    }
}

impl From<ReadError> for EngineError {
    fn from(err: ReadError) -> Self {
        EngineError::Read(err)
    }
}

/// A connection could not be matched to any recorded attack start.
///
/// Internal degradation, not a run-ending failure: the engine logs it, clears
/// the player's pending-attack tracking and skips emitting a result for the
/// event. Emitting nothing is deliberate; a guessed startup would produce a
/// numerically wrong data point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedStartup {
    /// The player whose connection could not be attributed.
    pub side: Side,
    /// The attack sequence value that was searched for.
    pub wanted_seq: i32,
    /// How many stale start records were discarded during the search.
    pub discarded: usize,
}

impl Display for UnresolvedStartup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no start record with attack_seq {} for {} ({} stale records discarded)",
            self.wanted_seq, self.side, self.discarded
        )
    }
}

impl Error for UnresolvedStartup {}

// #########
// # TESTS #
// #########
