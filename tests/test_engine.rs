//! End-to-end runs of the analyser over scripted sources.


use framelens::codes::{StateCode, StringStateCode};
use framelens::{Analyser, EngineError, FrameDataPoint, ReadField, Side};
use stubs::{
    fast_config, neutral, with_attack, with_connected, with_recovery, with_state,
    with_string_state, RecordingSink, ScriptedSource, Step,
};

/// Runs a script to completion and returns everything the sink saw.
fn run(steps: Vec<Step>) -> RecordingSink {
    let source = ScriptedSource::new(steps);
    let mut analyser = Analyser::new(source, fast_config()).expect("valid config");
    let handle = analyser.stop_handle();
    analyser.source_mut().stop_when_done = Some(handle);

    let mut sink = RecordingSink::default();
    analyser.start(&mut sink).expect("scripted run succeeds");
    sink
}

/// A single discrete attack: started at tick 100, connecting at tick 106.
fn single_hit_script() -> Vec<Step> {
    let mut steps = vec![Step::Frame(neutral(99))];
    for tick in 100..=105 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P1, 10, 1, 20)));
    }
    let connection = with_connected(
        with_recovery(with_attack(neutral(106), Side::P1, 10, 1, 20), Side::P2, 10),
        Side::P1,
    );
    steps.push(Step::Frame(connection));
    steps
}

#[test]
fn single_hit_produces_one_frame_data_point() {
    let sink = run(single_hit_script());

    // startup 6, advantage 6 - (20 - 10) = -4
    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 6,
            frame_advantage: -4,
        }]
    );
    assert_eq!(sink.acquired, 1);
    // One distance and one status per recorded frame, ticks 99 through 106.
    assert_eq!(sink.distances.len(), 8);
    assert_eq!(sink.statuses.len(), 8);
}

#[test]
fn follow_up_attack_discards_the_stale_start() {
    let mut steps = vec![Step::Frame(neutral(99))];
    // First attack instance, never connects.
    for tick in 100..=102 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P1, 10, 1, 25)));
    }
    // Follow-up reuses the move id; only the sequence counter moves.
    for tick in 103..=105 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P1, 10, 2, 20)));
    }
    let connection = with_connected(
        with_recovery(with_attack(neutral(106), Side::P1, 10, 2, 20), Side::P2, 10),
        Side::P1,
    );
    steps.push(Step::Frame(connection));

    let sink = run(steps);
    // Attribution lands on the follow-up: startup 106 - 103 = 3.
    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 3,
            frame_advantage: 3 - (20 - 10),
        }]
    );
}

#[test]
fn move_change_at_connection_switches_to_direct_differential() {
    let mut steps = vec![Step::Frame(neutral(99))];
    for tick in 100..=105 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P1, 10, 1, 20)));
    }
    // The attacker is already in a new animation when the hit registers.
    let connection = with_connected(
        with_recovery(with_attack(neutral(106), Side::P1, 11, 1, 12), Side::P2, 30),
        Side::P1,
    );
    steps.push(Step::Frame(connection));

    let sink = run(steps);
    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 6,
            frame_advantage: 30 - 12,
        }]
    );
}

#[test]
fn opponent_connection_is_negated_with_zero_startup() {
    let mut steps = vec![Step::Frame(neutral(99))];
    for tick in 100..=105 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P2, 30, 1, 20)));
    }
    let connection = with_connected(
        with_recovery(with_attack(neutral(106), Side::P2, 30, 1, 20), Side::P1, 10),
        Side::P2,
    );
    steps.push(Step::Frame(connection));

    let sink = run(steps);
    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 0,
            frame_advantage: (20 - 10) - 6,
        }]
    );
}

/// A two-hit string: start at 100, connections at 103 and 105.
fn string_script(ended_ticks: &[(u32, StringStateCode)]) -> Vec<Step> {
    let mut steps = vec![Step::Frame(neutral(99))];
    for tick in 100..=102 {
        steps.push(Step::Frame(with_attack(neutral(tick), Side::P1, 10, 1, 20)));
    }

    let in_string = |tick: u32, state: StringStateCode| {
        with_string_state(
            with_state(
                with_recovery(with_attack(neutral(tick), Side::P1, 10, 1, 20), Side::P2, 14),
                Side::P1,
                StateCode::StringAttack,
            ),
            Side::P1,
            state,
        )
    };

    steps.push(Step::Frame(with_connected(
        in_string(103, StringStateCode::Active),
        Side::P1,
    )));
    steps.push(Step::Frame(in_string(104, StringStateCode::Active)));
    steps.push(Step::Frame(with_connected(
        in_string(105, StringStateCode::Active),
        Side::P1,
    )));
    for &(tick, state) in ended_ticks {
        steps.push(Step::Frame(in_string(tick, state)));
    }
    steps
}

#[test]
fn string_resolves_after_three_consecutive_ended_ticks() {
    let sink = run(string_script(&[
        (106, StringStateCode::Ended),
        (107, StringStateCode::Ended),
        (108, StringStateCode::Ended),
    ]));

    // Startup from the first hit (103 - 100), advantage from the last
    // buffered connection at 105: 3 - (20 - 14) = -3.
    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 3,
            frame_advantage: -3,
        }]
    );
}

#[test]
fn ended_flicker_defers_resolution_without_losing_the_string() {
    let sink = run(string_script(&[
        (106, StringStateCode::Ended),
        (107, StringStateCode::Ended),
        // The flag dips back to active before the third tick.
        (108, StringStateCode::Active),
        (109, StringStateCode::Ended),
        (110, StringStateCode::Ended),
        (111, StringStateCode::Ended),
    ]));

    assert_eq!(
        sink.frame_data,
        vec![FrameDataPoint {
            startup_frames: 3,
            frame_advantage: -3,
        }]
    );
}

#[test]
fn unchanged_tick_skips_the_iteration() {
    let sink = run(vec![
        Step::Frame(neutral(99)),
        Step::Frame(neutral(100)),
        Step::Stall,
        Step::Frame(neutral(101)),
    ]);
    // The stalled iteration records nothing.
    assert_eq!(sink.distances.len(), 3);
    assert!(sink.frame_data.is_empty());
}

#[test]
fn clock_jump_is_read_best_effort() {
    let sink = run(vec![
        Step::Frame(neutral(99)),
        Step::Frame(neutral(100)),
        Step::Frame(neutral(105)),
    ]);
    assert_eq!(sink.distances.len(), 3);
}

#[test]
fn connection_without_a_recorded_start_is_skipped() {
    let sink = run(vec![
        Step::Frame(neutral(99)),
        Step::Frame(with_connected(neutral(100), Side::P1)),
        Step::Frame(neutral(101)),
    ]);
    // No start record ever existed, so no result may be fabricated, but the
    // run itself continues.
    assert!(sink.frame_data.is_empty());
    assert_eq!(sink.distances.len(), 3);
}

#[test]
fn frame_read_failure_aborts_the_run() {
    let source = ScriptedSource::new(vec![Step::Frame(neutral(99)), Step::FailFrame]);
    let mut analyser = Analyser::new(source, fast_config()).expect("valid config");
    let mut sink = RecordingSink::default();

    let err = analyser.start(&mut sink).expect_err("scripted failure");
    match err {
        EngineError::Read(read) => assert_eq!(read.field, ReadField::Frame),
        other => panic!("expected a read error, got {other:?}"),
    }
    // The first frame was read successfully before the failure.
    assert_eq!(sink.acquired, 1);
    assert_eq!(sink.distances.len(), 1);
}

#[test]
fn tick_read_failure_aborts_before_acquisition() {
    let source = ScriptedSource::new(vec![Step::FailTick]);
    let mut analyser = Analyser::new(source, fast_config()).expect("valid config");
    let mut sink = RecordingSink::default();

    let err = analyser.start(&mut sink).expect_err("scripted failure");
    match err {
        EngineError::Read(read) => assert_eq!(read.field, ReadField::Tick),
        other => panic!("expected a read error, got {other:?}"),
    }
    assert_eq!(sink.acquired, 0);
}

#[test]
fn restart_begins_a_fresh_run() {
    let source = ScriptedSource::new(vec![Step::Frame(neutral(99)), Step::Frame(neutral(100))]);
    let mut analyser = Analyser::new(source, fast_config()).expect("valid config");
    let handle = analyser.stop_handle();
    analyser.source_mut().stop_when_done = Some(handle);

    let mut sink = RecordingSink::default();
    analyser.start(&mut sink).expect("first run succeeds");
    assert!(analyser.is_stopped());
    assert_eq!(sink.acquired, 1);
    assert_eq!(sink.distances.len(), 2);

    // The second run starts over on a much earlier tick; a surviving
    // history would misread that as drift, a fresh one just reads.
    analyser
        .source_mut()
        .extend(vec![Step::Frame(neutral(50)), Step::Frame(neutral(51))]);
    analyser.start(&mut sink).expect("second run succeeds");

    assert_eq!(analyser.source_mut().init_calls, 2);
    assert_eq!(sink.acquired, 2);
    assert_eq!(sink.distances.len(), 4);
}
