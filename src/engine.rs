//! The analyser: the polling loop and the wiring between all the pieces.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use web_time::Instant;

use crate::advantage::frame_data;
use crate::codes::UnknownCodeLog;
use crate::config::AnalyserConfig;
use crate::detector::{connection_event, AttackDetector};
use crate::error::EngineError;
use crate::frame::GameFrame;
use crate::history::BoundedHistory;
use crate::scheduler::{poll_decision, PollDecision, TickPacer};
use crate::sink::ResultSink;
use crate::source::GameStateSource;
use crate::startup::resolve_startup;
use crate::strings::StringTracker;
use crate::{FramelensResult, Side};

/// Cooperative stop signal for a running [`Analyser`].
///
/// Cheap to clone; all clones and the analyser itself share one flag.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests that the polling loop exit. Idempotent and thread-safe.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The frame-data analysis engine.
///
/// Owns the [`GameStateSource`], the frame history and all per-player
/// detection state; nothing is global and nothing engine-owned is locked.
/// [`start`](Self::start) blocks its calling thread in the polling loop, so
/// the analyser normally lives on a dedicated thread while consumers read a
/// [`LatestResults`](crate::LatestResults) clone elsewhere.
#[derive(Debug)]
pub struct Analyser<S> {
    source: S,
    config: AnalyserConfig,
    history: BoundedHistory<GameFrame>,
    detector: AttackDetector,
    p1_strings: StringTracker,
    p2_strings: StringTracker,
    unknown_codes: UnknownCodeLog,
    pacer: TickPacer,
    stop: Arc<AtomicBool>,
}

impl<S: GameStateSource> Analyser<S> {
    /// Creates an analyser over the given source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when any ring capacity or the
    /// clock configuration is unusable.
    pub fn new(source: S, config: AnalyserConfig) -> FramelensResult<Self> {
        if let Some(info) = config.validate() {
            return Err(EngineError::InvalidConfig { info });
        }
        let invalid = |info: &str| EngineError::InvalidConfig {
            info: info.to_owned(),
        };
        Ok(Self {
            source,
            config,
            history: BoundedHistory::with_capacity(config.frame_history_capacity)
                .ok_or_else(|| invalid("frame history capacity"))?,
            detector: AttackDetector::new(config.start_ring_capacity)
                .ok_or_else(|| invalid("start ring capacity"))?,
            p1_strings: StringTracker::new(
                Side::P1,
                config.string_ring_capacity,
                config.string_debounce_ticks,
            )
            .ok_or_else(|| invalid("string ring capacity"))?,
            p2_strings: StringTracker::new(
                Side::P2,
                config.string_ring_capacity,
                config.string_debounce_ticks,
            )
            .ok_or_else(|| invalid("string ring capacity"))?,
            unknown_codes: UnknownCodeLog::new(),
            pacer: TickPacer::new(config.poll_period()),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The configuration this analyser was built with.
    #[must_use]
    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Mutable access to the owned source, for reconfiguring it between
    /// runs.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// A handle that can stop the polling loop from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop),
        }
    }

    /// Requests that the polling loop exit. Idempotent.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Attaches to the source and runs the polling loop until
    /// [`stop`](Self::stop) is called or a read fails.
    ///
    /// Blocks the calling thread. Each successful `start` run begins from a
    /// clean slate: the stop flag is re-armed and no analysis state survives
    /// from a previous run. Sink callbacks execute on this thread inside the
    /// tick budget and must not block for longer than the poll period.
    ///
    /// # Errors
    ///
    /// [`EngineError::Init`] when the source cannot attach;
    /// [`EngineError::Read`] when a poll fails mid-run. Retry and backoff
    /// policy belongs to the caller.
    pub fn start(&mut self, sink: &mut dyn ResultSink) -> FramelensResult<()> {
        self.stop.store(false, Ordering::SeqCst);
        self.history.clear();
        self.detector.clear_all();
        self.p1_strings.reset();
        self.p2_strings.reset();

        self.source.init()?;
        let side = self.source.read_player_side()?;
        tracing::info!(%side, period = ?self.pacer.period(), "analysis started");

        let mut acquired = false;
        while !self.is_stopped() {
            let iteration_start = Instant::now();
            let live = self.source.read_current_tick()?;

            match poll_decision(self.history.head_tick(), live) {
                PollDecision::Skip => {
                    self.pacer.pace(iteration_start);
                    continue;
                }
                PollDecision::DriftRead { frames_off } => {
                    tracing::warn!(frames_off, %live, "game clock drifted, reading anyway");
                }
                PollDecision::Read => {}
            }

            let frame = self.source.read_frame()?;
            if !acquired {
                acquired = true;
                sink.on_source_acquired();
            }
            self.unknown_codes.observe_frame(&frame);
            self.history.push(frame);
            self.analyse(sink);

            self.pacer.pace(iteration_start);
        }

        tracing::info!("analysis stopped");
        Ok(())
    }

    /// Runs detection and resolution over the newest recorded frame.
    fn analyse(&mut self, sink: &mut dyn ResultSink) {
        let Some(curr) = self.history.head().copied() else {
            return;
        };
        sink.on_distance(curr.distance());
        sink.on_status(curr.p1.intent.status());

        // Detection needs a previous/current pair; the first recorded frame
        // only primes the history.
        let Some(prev) = self.history.peek_from_head(1).copied() else {
            return;
        };

        self.detector
            .record_attacks(&prev, &curr, self.history.head_index());

        if let Some(side) = connection_event(&prev, &curr).side() {
            self.handle_connection(side, &prev, &curr, sink);
        }

        for side in [Side::P1, Side::P2] {
            if let Some(resolved) = self.tracker_mut(side).observe(&curr) {
                self.detector.clear_starts(resolved.connected.other());
                let point = frame_data(
                    resolved.connected,
                    resolved.start,
                    resolved.first_connection_tick,
                    &resolved.previous_attacker,
                    &resolved.resolution,
                );
                tracing::debug!(%point, %side, "string frame data resolved");
                sink.on_frame_data(point);
            }
        }
    }

    /// Reacts to a fresh connection edge for one player.
    fn handle_connection(
        &mut self,
        side: Side,
        prev: &GameFrame,
        curr: &GameFrame,
        sink: &mut dyn ResultSink,
    ) {
        // A landed hit invalidates whatever the other player had pending.
        self.detector.clear_starts(side.other());

        if self.tracker(side).is_active() {
            self.tracker_mut(side).buffer_connection(curr);
            return;
        }

        // The connection tick may already carry a re-initiated attack, so
        // the correlation key comes from the preceding frame.
        let wanted_seq = prev.player(side).attack_seq;
        let start = match resolve_startup(self.detector.starts_mut(side), wanted_seq, side) {
            Ok(start) => start,
            Err(err) => {
                tracing::warn!(%err, tick = %curr.tick, "skipping unattributable connection");
                return;
            }
        };
        let previous_attacker = *prev.player(side);

        if curr.player(side).state_id.is_string_animation() {
            self.tracker_mut(side).begin(start, previous_attacker, *curr);
        } else {
            let point = frame_data(side, start, curr.tick, &previous_attacker, curr);
            tracing::debug!(%point, %side, tick = %curr.tick, "frame data resolved");
            sink.on_frame_data(point);
        }
    }

    fn tracker(&self, side: Side) -> &StringTracker {
        match side {
            Side::P1 => &self.p1_strings,
            Side::P2 => &self.p2_strings,
        }
    }

    fn tracker_mut(&mut self, side: Side) -> &mut StringTracker {
        match side {
            Side::P1 => &mut self.p1_strings,
            Side::P2 => &mut self.p2_strings,
        }
    }
}

// #########
// # TESTS #
// #########
