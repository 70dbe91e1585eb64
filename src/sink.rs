//! Delivery of computed results to consumers.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::codes::StatusCategory;
use crate::frame::FrameDataPoint;

/// Receiver for the engine's output streams.
///
/// All callbacks run on the engine's polling thread, inside the tick budget;
/// an implementation that blocks for longer than the poll period stalls the
/// analysis. Hand the data off and return. Every method has a no-op default
/// so consumers only implement the streams they care about.
pub trait ResultSink {
    /// A frame-data result was computed for a resolved connection.
    fn on_frame_data(&mut self, point: FrameDataPoint) {
        let _ = point;
    }

    /// Inter-player distance for the latest recorded frame.
    fn on_distance(&mut self, distance: f32) {
        let _ = distance;
    }

    /// Coarse status of the locally tracked player for the latest frame.
    fn on_status(&mut self, status: StatusCategory) {
        let _ = status;
    }

    /// The source produced its first successful frame read of this run.
    /// Fired exactly once per [`start`](crate::Analyser::start) call.
    fn on_source_acquired(&mut self) {}
}

/// The most recently published value of each stream.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ResultsSnapshot {
    /// Latest frame-data result, if any connection has resolved yet.
    pub frame_data: Option<FrameDataPoint>,
    /// Latest inter-player distance.
    pub distance: Option<f32>,
    /// Latest local-player status.
    pub status: Option<StatusCategory>,
    /// Whether the source has been acquired this run.
    pub source_acquired: bool,
}

/// A shared last-value cell, for consumers that poll instead of subscribing.
///
/// Clone it, hand one clone to the engine as the sink and read
/// [`snapshot`](Self::snapshot) from any other thread. Values are
/// overwritten, not queued; a slow reader sees the freshest state, never a
/// backlog.
#[derive(Debug, Clone, Default)]
pub struct LatestResults {
    inner: Arc<Mutex<ResultsSnapshot>>,
}

impl LatestResults {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the current values.
    #[must_use]
    pub fn snapshot(&self) -> ResultsSnapshot {
        *self.inner.lock()
    }
}

impl ResultSink for LatestResults {
    fn on_frame_data(&mut self, point: FrameDataPoint) {
        self.inner.lock().frame_data = Some(point);
    }

    fn on_distance(&mut self, distance: f32) {
        self.inner.lock().distance = Some(distance);
    }

    fn on_status(&mut self, status: StatusCategory) {
        self.inner.lock().status = Some(status);
    }

    fn on_source_acquired(&mut self) {
        self.inner.lock().source_acquired = true;
    }
}

// #########
// # TESTS #
// #########
