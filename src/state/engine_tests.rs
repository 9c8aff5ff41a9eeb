//! Tests for the engine composition.
//!
//! Calibration results are injected directly; rows from the test harness have
//! short messages, so every row estimates to the smallest bucket.

use super::*;
use crate::model::RowId;
use crate::source::FetchDirection;
use crate::state::pagination::{FetchOrigin, DEFAULT_BATCH_SIZE, DEFAULT_TAIL_INTERVAL};
use crate::test_harness::rows;
use crate::view_state::CalibrationSample;

/// Cache whose buckets are `per_line` characters apart and `line_height` tall per line.
fn cache(per_line: usize, line_height: usize) -> HeightCache {
    let samples = (1..=3)
        .map(|k| CalibrationSample {
            char_length: k * per_line,
            height: k * line_height,
        })
        .collect();
    HeightCache::from_samples(samples, 1.0, per_line).unwrap()
}

fn engine(row_count: usize) -> Engine {
    Engine::new(
        EngineConfig::default(),
        ViewportDimensions::new(80, 20),
        LogStore::from_rows(rows("seed", row_count)),
    )
}

/// Engine after the first calibration has landed.
fn started(row_count: usize) -> (Engine, Vec<Command>) {
    let mut engine = engine(row_count);
    engine.start();
    let commands = engine.handle(EngineEvent::CalibrationFinished {
        epoch: 1,
        result: Ok(cache(80, 1)),
    });
    (engine, commands)
}

fn id_at(engine: &Engine, index: usize) -> Option<String> {
    engine
        .store()
        .get(index)
        .ok()
        .and_then(|r| r.id().map(RowId::as_str).map(str::to_string))
}

// ===== Startup and calibration =====

#[test]
fn start_requests_first_calibration() {
    let mut engine = engine(500);

    let commands = engine.start();

    assert_eq!(
        commands,
        vec![Command::Calibrate(CalibrationRequest {
            epoch: 1,
            width: 80,
        })]
    );
    assert!(engine.is_loading());
}

#[test]
fn first_calibration_jumps_to_newest_and_tails() {
    let (engine, commands) = started(500);

    assert!(!engine.is_loading());
    assert_eq!(commands, vec![Command::StartTailTimer(DEFAULT_TAIL_INTERVAL)]);
    assert_eq!(engine.window_state().visible_stop_index(), Some(499));
    assert_eq!(engine.window_state().scroll_offset, 480);
    assert_eq!(engine.total_height(), 500);
    assert!(engine.flags().is_tailing);
}

#[test]
fn stale_calibration_is_discarded() {
    let mut engine = engine(500);
    engine.start();
    let t0 = Instant::now();
    engine.handle(EngineEvent::Resized {
        dimensions: ViewportDimensions::new(60, 20),
        at: t0,
    });
    let commands = engine.handle(EngineEvent::ResizeDeadline {
        at: t0 + Duration::from_millis(100),
    });
    assert_eq!(
        commands,
        vec![Command::Calibrate(CalibrationRequest {
            epoch: 2,
            width: 60,
        })]
    );

    let commands = engine.handle(EngineEvent::CalibrationFinished {
        epoch: 1,
        result: Ok(cache(80, 1)),
    });

    assert!(commands.is_empty());
    assert!(engine.is_loading());
}

#[test]
fn resize_burst_is_debounced_on_trailing_edge() {
    let (mut engine, _) = started(500);
    let t0 = Instant::now();

    let first = engine.handle(EngineEvent::Resized {
        dimensions: ViewportDimensions::new(70, 20),
        at: t0,
    });
    let early = engine.handle(EngineEvent::ResizeDeadline {
        at: t0 + Duration::from_millis(50),
    });
    let second = engine.handle(EngineEvent::Resized {
        dimensions: ViewportDimensions::new(60, 20),
        at: t0 + Duration::from_millis(50),
    });
    let settled = engine.handle(EngineEvent::ResizeDeadline {
        at: t0 + Duration::from_millis(150),
    });

    assert_eq!(first, vec![Command::WakeAt(t0 + Duration::from_millis(100))]);
    assert!(early.is_empty());
    assert_eq!(second, vec![Command::WakeAt(t0 + Duration::from_millis(150))]);
    assert_eq!(
        settled,
        vec![Command::Calibrate(CalibrationRequest {
            epoch: 2,
            width: 60,
        })]
    );
}

#[test]
fn failed_calibration_hides_the_list() {
    let mut engine = engine(500);
    engine.start();

    engine.handle(EngineEvent::CalibrationFinished {
        epoch: 1,
        result: Err(CalibrationError::NoSamples),
    });

    assert!(engine.is_loading());
    assert!(engine.rendered_rows().is_empty());
    assert_eq!(
        engine.last_error(),
        Some(&EngineError::Calibration(CalibrationError::NoSamples))
    );
}

/// Resize to `width` and let the burst settle, opening the next epoch.
fn resize(engine: &mut Engine, width: usize) -> Vec<Command> {
    let t0 = Instant::now();
    engine.handle(EngineEvent::Resized {
        dimensions: ViewportDimensions::new(width, 20),
        at: t0,
    });
    engine.handle(EngineEvent::ResizeDeadline {
        at: t0 + Duration::from_millis(100),
    })
}

#[test]
fn failed_epoch_holds_tail_polls_and_keeps_tailing() {
    let (mut engine, _) = started(500);
    resize(&mut engine, 40);
    let failed = engine.handle(EngineEvent::CalibrationFinished {
        epoch: 2,
        result: Err(CalibrationError::NoSamples),
    });

    let tick = engine.handle(EngineEvent::TailTick);

    assert!(failed.is_empty());
    assert!(tick.is_empty());
    assert!(engine.flags().is_tailing);
    assert!(!engine.flags().is_loading_newer_rows);

    resize(&mut engine, 80);
    let recalibrated = engine.handle(EngineEvent::CalibrationFinished {
        epoch: 3,
        result: Ok(cache(80, 1)),
    });

    assert!(recalibrated.is_empty());
    assert!(engine.flags().is_tailing);
    assert_eq!(engine.window_state().visible_stop_index(), Some(499));
    assert_eq!(
        engine.last_error(),
        Some(&EngineError::Calibration(CalibrationError::NoSamples))
    );
    assert_eq!(
        engine.handle(EngineEvent::TailTick),
        vec![Command::Fetch(FetchRequest {
            direction: FetchDirection::Newer,
            count: DEFAULT_BATCH_SIZE,
            origin: FetchOrigin::Tail,
        })]
    );
}

#[test]
fn older_rows_landing_in_failed_epoch_reanchor_on_next_calibration() {
    let (mut engine, _) = started(500);
    engine.handle(EngineEvent::Scrolled { offset: 150 });
    let anchored = id_at(&engine, 150);
    resize(&mut engine, 40);
    engine.handle(EngineEvent::CalibrationFinished {
        epoch: 2,
        result: Err(CalibrationError::NoSamples),
    });

    engine.handle(EngineEvent::FetchCompleted {
        request: FetchRequest {
            direction: FetchDirection::Older,
            count: DEFAULT_BATCH_SIZE,
            origin: FetchOrigin::Edge,
        },
        rows: rows("old", 300),
    });

    assert_eq!(engine.store().len(), 800);
    assert_eq!(
        engine.last_error(),
        Some(&EngineError::Calibration(CalibrationError::NoSamples))
    );

    resize(&mut engine, 80);
    engine.handle(EngineEvent::CalibrationFinished {
        epoch: 3,
        result: Ok(cache(80, 1)),
    });

    assert_eq!(engine.window_state().visible_start_index(), 450);
    assert_eq!(id_at(&engine, 450), anchored);
    assert!(!engine.flags().is_tailing);
}

#[test]
fn recalibration_keeps_the_first_visible_row() {
    let (mut engine, _) = started(500);
    engine.handle(EngineEvent::Scrolled { offset: 200 });
    assert_eq!(engine.window_state().visible_start_index(), 200);

    let t0 = Instant::now();
    engine.handle(EngineEvent::Resized {
        dimensions: ViewportDimensions::new(40, 20),
        at: t0,
    });
    engine.handle(EngineEvent::ResizeDeadline {
        at: t0 + Duration::from_millis(100),
    });
    // Narrower container: every row now wraps onto two lines
    engine.handle(EngineEvent::CalibrationFinished {
        epoch: 2,
        result: Ok(cache(10, 1)),
    });

    assert_eq!(engine.window_state().visible_start_index(), 200);
    assert_eq!(engine.window_state().scroll_offset, 400);
    assert_eq!(engine.total_height(), 1000);
}

// ===== Scrolling and pagination =====

#[test]
fn scroll_before_calibration_is_ignored() {
    let mut engine = engine(500);
    engine.start();

    let commands = engine.handle(EngineEvent::Scrolled { offset: 100 });

    assert!(commands.is_empty());
    assert_eq!(engine.window_state().scroll_offset, 0);
}

#[test]
fn scrolling_up_near_head_prepends_without_moving_content() {
    let (mut engine, _) = started(500);

    let commands = engine.handle(EngineEvent::Scrolled { offset: 150 });
    let request = FetchRequest {
        direction: FetchDirection::Older,
        count: DEFAULT_BATCH_SIZE,
        origin: FetchOrigin::Edge,
    };
    assert_eq!(
        commands,
        vec![Command::StopTailTimer, Command::Fetch(request)]
    );
    let anchored = id_at(&engine, 150);

    engine.handle(EngineEvent::FetchCompleted {
        request,
        rows: rows("old", 300),
    });

    assert_eq!(engine.store().len(), 800);
    assert_eq!(engine.window_state().visible_start_index(), 450);
    assert_eq!(id_at(&engine, 450), anchored);
    assert!(!engine.flags().is_loading_older_rows);
}

#[test]
fn tail_ticks_stream_rows_and_stay_at_bottom() {
    let (mut engine, _) = started(500);
    let request = FetchRequest {
        direction: FetchDirection::Newer,
        count: DEFAULT_BATCH_SIZE,
        origin: FetchOrigin::Tail,
    };

    for tick in 0..3 {
        let commands = engine.handle(EngineEvent::TailTick);
        assert_eq!(commands, vec![Command::Fetch(request)]);
        engine.handle(EngineEvent::FetchCompleted {
            request,
            rows: rows(&format!("tail{tick}"), 10),
        });
    }

    assert_eq!(engine.store().len(), 530);
    assert_eq!(engine.window_state().visible_stop_index(), Some(529));
    assert!(engine.flags().is_tailing);
}

#[test]
fn fetch_failure_is_surfaced_and_store_unchanged() {
    let (mut engine, _) = started(500);
    engine.handle(EngineEvent::Scrolled { offset: 150 });

    engine.handle(EngineEvent::FetchFailed {
        request: FetchRequest {
            direction: FetchDirection::Older,
            count: DEFAULT_BATCH_SIZE,
            origin: FetchOrigin::Edge,
        },
        error: FetchError::Aborted,
    });

    assert_eq!(engine.store().len(), 500);
    assert_eq!(engine.window_state().visible_start_index(), 150);
    assert_eq!(
        engine.last_error(),
        Some(&EngineError::Fetch(FetchError::Aborted))
    );
}

#[test]
fn scroll_to_unknown_index_reports_error() {
    let (mut engine, _) = started(10);

    engine.handle(EngineEvent::ScrollToIndex {
        index: 10,
        align: Align::Start,
    });

    assert_eq!(
        engine.last_error(),
        Some(&EngineError::IndexOutOfRange { index: 10, len: 10 })
    );
}

#[test]
fn follow_latest_after_scrolling_away_restarts_tailing() {
    let (mut engine, _) = started(500);
    engine.handle(EngineEvent::Scrolled { offset: 300 });
    assert!(!engine.flags().is_tailing);

    let commands = engine.handle(EngineEvent::FollowLatest);

    assert_eq!(commands, vec![Command::StartTailTimer(DEFAULT_TAIL_INTERVAL)]);
    assert_eq!(engine.window_state().visible_stop_index(), Some(499));
}

#[test]
fn rendered_rows_include_overscan() {
    let (mut engine, _) = started(500);
    engine.handle(EngineEvent::ScrollToIndex {
        index: 100,
        align: Align::Start,
    });

    let rendered = engine.rendered_rows();

    assert_eq!(rendered.first().map(|(slot, _)| slot.index), Some(95));
    assert_eq!(rendered.last().map(|(slot, _)| slot.index), Some(124));
    assert_eq!(rendered[5].0.top, 100);
}
