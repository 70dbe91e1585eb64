//! Console front-end: runs the analyser over a synthetic sparring match and
//! prints every computed result.
//!
//! ```text
//! cargo run --example print_frame_data -- --seconds 3
//! ```

#![allow(clippy::print_stdout)]

use clap::Parser;
use framelens::codes::MoveCode;
use framelens::{
    Analyser, AnalyserConfig, FrameDataPoint, GameFrame, GameStateSource, InitError, ReadError,
    ResultSink, Side, Tick,
};

#[derive(Parser, Debug)]
#[command(about = "Print frame data computed from a synthetic match")]
struct Args {
    /// How long to run the analysis.
    #[arg(long, default_value_t = 5)]
    seconds: u64,

    /// Simulated game frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Also print the distance stream (one line per change).
    #[arg(long)]
    distance: bool,
}

/// A fake game: the local player pokes with a 6-frame jab every second.
struct SyntheticMatch {
    tick: u32,
    attack_seq: i32,
}

impl SyntheticMatch {
    fn new() -> Self {
        Self {
            tick: 0,
            attack_seq: 0,
        }
    }

    fn frame_at(&self, tick: u32) -> GameFrame {
        let mut frame = GameFrame {
            tick: Tick::new(tick),
            ..GameFrame::default()
        };
        frame.p1.position.x = 1500.0;
        frame.p2.position.x = -1500.0 - f32::from((tick % 60) as u16);
        frame.p1.attack_seq = self.attack_seq;

        // Phase 10..=16 of each cycle is the jab; it lands on the last tick.
        let phase = tick % 60;
        if (10..=16).contains(&phase) {
            frame.p1.move_id = MoveCode::new(417);
            frame.p1.recovery_frames = 20 - (phase - 10);
            if phase == 16 {
                frame.p1.connected = true;
                frame.p2.recovery_frames = 12;
            }
        }
        frame
    }
}

impl GameStateSource for SyntheticMatch {
    fn init(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    fn read_current_tick(&mut self) -> Result<Tick, ReadError> {
        self.tick += 1;
        if self.tick % 60 == 10 {
            self.attack_seq += 1;
        }
        Ok(Tick::new(self.tick))
    }

    fn read_frame(&mut self) -> Result<GameFrame, ReadError> {
        Ok(self.frame_at(self.tick))
    }

    fn read_player_side(&mut self) -> Result<Side, ReadError> {
        Ok(Side::P1)
    }
}

struct Printer {
    show_distance: bool,
    last_distance: Option<f32>,
}

impl ResultSink for Printer {
    fn on_frame_data(&mut self, point: FrameDataPoint) {
        println!("{point}");
    }

    fn on_distance(&mut self, distance: f32) {
        if !self.show_distance {
            return;
        }
        let rounded = (distance * 100.0).round() / 100.0;
        if self.last_distance != Some(rounded) {
            self.last_distance = Some(rounded);
            println!("distance: {rounded:.2}");
        }
    }

    fn on_source_acquired(&mut self) {
        println!("source acquired, analysing...");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = AnalyserConfig::for_fps(args.fps);
    let mut analyser = match Analyser::new(SyntheticMatch::new(), config) {
        Ok(analyser) => analyser,
        Err(err) => {
            tracing::error!(%err, "could not build the analyser");
            return;
        }
    };
    let handle = analyser.stop_handle();

    let mut sink = Printer {
        show_distance: args.distance,
        last_distance: None,
    };
    let seconds = args.seconds;
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_secs(seconds));
        handle.stop();
    });

    if let Err(err) = analyser.start(&mut sink) {
        tracing::error!(%err, "analysis run failed");
    }
}
