//! The read-only boundary between the engine and the running game.

use crate::error::{InitError, ReadError};
use crate::frame::GameFrame;
use crate::{Side, Tick};

/// Supplier of live game state.
///
/// Implementations wrap whatever actually holds the game: an emulator's
/// process memory, a replay file, a network tap, a scripted fixture in tests.
/// The engine never writes through this trait.
///
/// # Contract
///
/// * `read_frame` returns a whole, internally consistent snapshot or an
///   error; partial frames must not be surfaced. The individual fields may be
///   read non-atomically underneath as long as the struct handed back is
///   coherent.
/// * Sides are normalized before the frame leaves the source:
///   [`GameFrame::p1`] is always the locally tracked player regardless of
///   which screen side the game assigned them.
/// * Methods take `&mut self`; the engine owns the source and calls from a
///   single thread.
pub trait GameStateSource {
    /// Attaches to the game.
    ///
    /// Called once per [`start`](crate::Analyser::start) run before any
    /// reads. Failures here are not retried by the engine.
    fn init(&mut self) -> Result<(), InitError>;

    /// Reads the game's current frame counter.
    ///
    /// Cheap relative to [`read_frame`](Self::read_frame); the engine calls
    /// it every poll iteration to decide whether a full read is worthwhile.
    fn read_current_tick(&mut self) -> Result<Tick, ReadError>;

    /// Reads a full dual-player snapshot for the current tick.
    fn read_frame(&mut self) -> Result<GameFrame, ReadError>;

    /// Reads which screen side the locally tracked player occupies.
    fn read_player_side(&mut self) -> Result<Side, ReadError>;
}
