//! # Framelens
//!
//! Framelens is a frame-data analysis engine for fighting games running under
//! an emulator. It polls snapshots of the live game's memory at high frequency
//! (through a [`GameStateSource`] supplied by the caller), reconstructs a
//! per-tick picture of both players' animation state, and derives competitive
//! frame-data metrics: attack startup, frame advantage after a hit or block
//! connects, inter-player distance and a coarse player status.
//!
//! The engine owns all of its analysis state. There are no process-wide
//! singletons; create an [`Analyser`], hand it a [`ResultSink`] and call
//! [`Analyser::start`] on a dedicated thread. Results are pushed to the sink
//! as they are computed. A second thread (CLI printer, overlay, ...) can read
//! the latest published values through [`LatestResults`].
//!
//! ```no_run
//! use framelens::{Analyser, AnalyserConfig, LatestResults};
//! # struct Mem;
//! # impl framelens::GameStateSource for Mem {
//! #     fn init(&mut self) -> Result<(), framelens::InitError> { Ok(()) }
//! #     fn read_current_tick(&mut self) -> Result<framelens::Tick, framelens::ReadError> { todo!() }
//! #     fn read_frame(&mut self) -> Result<framelens::GameFrame, framelens::ReadError> { todo!() }
//! #     fn read_player_side(&mut self) -> Result<framelens::Side, framelens::ReadError> { todo!() }
//! # }
//! # let source = Mem;
//! let mut analyser = Analyser::new(source, AnalyserConfig::default()).unwrap();
//! let results = LatestResults::new();
//! let handle = analyser.stop_handle();
//!
//! let mut sink = results.clone();
//! let worker = std::thread::spawn(move || analyser.start(&mut sink));
//!
//! // ... read results.snapshot() from the UI thread, then:
//! handle.stop();
//! worker.join().unwrap().unwrap();
//! ```
//!
//! Polled memory is noisy: ticks can be missed or observed twice, and the
//! poller races the game's own simulation clock. The engine therefore never
//! correlates events across ticks by tick arithmetic alone; the game's
//! monotonically increasing attack sequence counter is the only correlation
//! key (see [`startup`]). Events that cannot be attributed are logged and
//! skipped rather than reported with wrong numbers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use advantage::frame_data;
pub use config::AnalyserConfig;
pub use detector::ConnectionEvent;
pub use engine::{Analyser, StopHandle};
pub use error::{EngineError, InitError, ReadError, ReadField};
pub use frame::{FrameDataPoint, GameFrame, PlayerFrame, Position, StartFrame};
pub use history::BoundedHistory;
pub use sink::{LatestResults, ResultSink, ResultsSnapshot};
pub use source::GameStateSource;

pub mod advantage;
pub mod codes;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod frame;
pub mod history;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod startup;
pub mod strings;

/// A convenient result alias for engine operations.
pub type FramelensResult<T> = Result<T, EngineError>;

/// A single step of the game's own simulation clock.
///
/// Ticks come straight out of the emulated game's frame counter, not from the
/// poller. The counter is `u32` in game memory and only ever increases during
/// a match.
///
/// # Type Safety
///
/// `Tick` is a newtype wrapper around `u32`: it keeps game-clock values from
/// being mixed up with buffer indices or the poller's own iteration count.
/// Subtracting two ticks yields a signed `i64` distance so that out-of-order
/// observations cannot wrap.
///
/// # Examples
///
/// ```
/// use framelens::Tick;
///
/// let start = Tick::new(100);
/// let connection = Tick::new(106);
/// assert_eq!(connection - start, 6);
/// assert_eq!(start + 1, Tick::new(101));
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Tick(u32);

impl Tick {
    /// Tick zero, the value of the game clock before a match starts.
    pub const ZERO: Tick = Tick(0);

    /// Creates a new `Tick` from a raw game-clock value.
    #[inline]
    #[must_use]
    pub const fn new(tick: u32) -> Self {
        Tick(tick)
    }

    /// Returns the underlying `u32` value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The tick immediately after this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Tick {
        Tick(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<u32> for Tick {
    type Output = Tick;

    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Tick(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u32> for Tick {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

impl std::ops::Sub<Tick> for Tick {
    /// Signed distance between two game-clock observations.
    type Output = i64;

    #[inline]
    fn sub(self, rhs: Tick) -> Self::Output {
        i64::from(self.0) - i64::from(rhs.0)
    }
}

impl From<u32> for Tick {
    #[inline]
    fn from(value: u32) -> Self {
        Tick(value)
    }
}

impl From<Tick> for u32 {
    #[inline]
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

impl PartialEq<u32> for Tick {
    #[inline]
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

/// Which player a value belongs to.
///
/// `P1` is always the locally tracked player: the [`GameStateSource`] swaps
/// the two player slots based on the side indicator it reads once per tick,
/// so screen-side assignment inside the game never leaks into the analysis.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Side {
    /// The locally tracked player.
    P1,
    /// The opposing player.
    P2,
}

impl Side {
    /// Returns the opposing side.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::P1 => write!(f, "P1"),
            Side::P2 => write!(f, "P2"),
        }
    }
}

// #########
// # TESTS #
// #########
