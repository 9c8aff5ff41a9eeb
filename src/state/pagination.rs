//! Bidirectional pagination and tailing.
//!
//! Pure state machine over the log store: `transition(state, event)` returns
//! the next state plus the effects the host must carry out (fetches, timer
//! changes, scroll re-anchoring). No I/O happens here.
//!
//! # States
//!
//! `LoadingOlder`, `LoadingNewer` and `Tailing` are independent flags; the
//! machine is `Idle` when none is set. Both edges may load concurrently, but
//! each edge has at most one fetch in flight. While tailing, newer rows come
//! only from the poll, never from the forward edge trigger.
//!
//! # Re-anchoring
//!
//! A prepend must never move content currently on screen: after `k` older
//! rows are inserted, the view jumps to `visible_start + k` with top
//! alignment. The anchor is read from the window at completion time, since
//! indices held across the awaited fetch are stale.

use crate::model::{EngineError, FetchError, LogStore, Row};
use crate::source::FetchDirection;
use crate::view_state::{Align, ScrollDirection, WindowState};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default distance (in rows) from an edge that triggers a fetch.
pub const DEFAULT_LOAD_THRESHOLD: usize = 200;
/// Default number of rows requested per fetch.
pub const DEFAULT_BATCH_SIZE: usize = 300;
/// Default interval between tail polls.
pub const DEFAULT_TAIL_INTERVAL: Duration = Duration::from_millis(2000);

/// Tunables for pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows from either edge at which a fetch is issued.
    pub load_threshold: usize,
    /// Rows requested per fetch.
    pub batch_size: usize,
    /// Period of the tail poll.
    pub tail_interval: Duration,
    /// Keep the previous stop row in view after an edge append.
    pub reanchor_newer: bool,
    /// Reserve head placeholders while an older fetch is in flight.
    pub reserve_placeholders: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
            tail_interval: DEFAULT_TAIL_INTERVAL,
            reanchor_newer: true,
            reserve_placeholders: false,
        }
    }
}

/// Flags guarding duplicate fetches and gating auto-follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlightFlags {
    /// An older-rows fetch is in flight.
    pub is_loading_older_rows: bool,
    /// A newer-rows fetch (edge or tail) is in flight.
    pub is_loading_newer_rows: bool,
    /// Auto-follow is active.
    pub is_tailing: bool,
}

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// User scrolled near an edge.
    Edge,
    /// Periodic tail poll.
    Tail,
}

/// A fetch the host must perform; echoed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Edge to extend.
    pub direction: FetchDirection,
    /// Rows to request.
    pub count: usize,
    /// Trigger of the fetch.
    pub origin: FetchOrigin,
}

/// Input to the pagination machine.
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationEvent {
    /// The window was recomputed (user scroll, jump, resize or mutation).
    WindowChanged(WindowState),
    /// A fetch resolved.
    FetchCompleted {
        /// The request being answered.
        request: FetchRequest,
        /// Rows in chronological order.
        rows: Vec<Row>,
    },
    /// A fetch rejected or timed out.
    FetchFailed {
        /// The request being answered.
        request: FetchRequest,
        /// Transport failure.
        error: FetchError,
    },
    /// The tail poll timer fired.
    TailTick,
    /// Host asked to jump to the newest row and follow it.
    FollowLatest,
}

/// Work the host must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue a fetch.
    Fetch(FetchRequest),
    /// Memoized heights at or after this index are stale.
    InvalidateFrom(usize),
    /// Jump the viewport to a row.
    ScrollToIndex {
        /// Target row.
        index: usize,
        /// Target placement.
        align: Align,
    },
    /// Start the periodic tail poll.
    StartTailing(Duration),
    /// Cancel the pending tail poll.
    StopTailing,
    /// Surface an error to the caller.
    Report(EngineError),
}

/// State owned by the pagination machine.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Row store.
    pub store: LogStore,
    /// In-flight and tailing flags.
    pub flags: FlightFlags,
    /// Placeholders reserved at the head for the in-flight older fetch.
    pub reserved_head: usize,
    /// Latest window observed.
    pub window: WindowState,
}

impl PaginationState {
    /// State over an initial store.
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }
}

/// Apply one event.
pub fn transition(
    state: PaginationState,
    event: PaginationEvent,
    config: &PaginationConfig,
) -> (PaginationState, Vec<Effect>) {
    match event {
        PaginationEvent::WindowChanged(window) => on_window_changed(state, window, config),
        PaginationEvent::FetchCompleted { request, rows } => match request.direction {
            FetchDirection::Older => on_older_loaded(state, rows),
            FetchDirection::Newer => on_newer_loaded(state, request, rows, config),
        },
        PaginationEvent::FetchFailed { request, error } => on_fetch_failed(state, request, error),
        PaginationEvent::TailTick => on_tail_tick(state, config),
        PaginationEvent::FollowLatest => on_follow_latest(state, config),
    }
}

fn on_window_changed(
    mut state: PaginationState,
    window: WindowState,
    config: &PaginationConfig,
) -> (PaginationState, Vec<Effect>) {
    let mut effects = Vec::new();
    state.window = window;

    let row_count = state.store.len();
    let at_bottom = match (window.visible_stop_index(), state.store.last_index()) {
        (Some(stop), Some(last)) => stop == last,
        _ => false,
    };

    if at_bottom && !state.flags.is_tailing {
        info!("Reached newest row, tailing");
        state.flags.is_tailing = true;
        effects.push(Effect::StartTailing(config.tail_interval));
    } else if !at_bottom && state.flags.is_tailing {
        info!("Left newest row, tailing stopped");
        state.flags.is_tailing = false;
        effects.push(Effect::StopTailing);
    }

    let start = window.visible_start_index();
    match window.scroll_direction {
        ScrollDirection::Backward
            if !state.flags.is_loading_older_rows && start < config.load_threshold =>
        {
            state.flags.is_loading_older_rows = true;
            if config.reserve_placeholders {
                let reserved = state.store.insert_at_head(Row::placeholders(config.batch_size));
                state.reserved_head = reserved;
                effects.push(Effect::InvalidateFrom(0));
                effects.push(Effect::ScrollToIndex {
                    index: start + reserved,
                    align: Align::Start,
                });
            }
            debug!(start, count = config.batch_size, "Loading older rows");
            effects.push(Effect::Fetch(FetchRequest {
                direction: FetchDirection::Older,
                count: config.batch_size,
                origin: FetchOrigin::Edge,
            }));
        }
        ScrollDirection::Forward
            if !state.flags.is_loading_newer_rows && !state.flags.is_tailing =>
        {
            let near_end = window
                .visible_stop_index()
                .is_some_and(|stop| stop + config.load_threshold > row_count);
            if near_end {
                state.flags.is_loading_newer_rows = true;
                debug!(row_count, count = config.batch_size, "Loading newer rows");
                effects.push(Effect::Fetch(FetchRequest {
                    direction: FetchDirection::Newer,
                    count: config.batch_size,
                    origin: FetchOrigin::Edge,
                }));
            }
        }
        _ => {}
    }

    (state, effects)
}

fn on_older_loaded(mut state: PaginationState, rows: Vec<Row>) -> (PaginationState, Vec<Effect>) {
    if !state.flags.is_loading_older_rows {
        warn!(rows = rows.len(), "Dropping stale older-rows completion");
        return (state, Vec::new());
    }
    state.flags.is_loading_older_rows = false;

    let fetched = rows.len();
    let anchor = state.window.visible_start_index();
    let shift = if state.reserved_head > 0 {
        let reserved = std::mem::take(&mut state.reserved_head);
        let reserved = reserved.min(state.store.leading_placeholders());
        state.store.replace_head(reserved, rows)
    } else {
        state.store.insert_at_head(rows) as isize
    };

    if shift == 0 && fetched == 0 {
        return (state, Vec::new());
    }

    let target = (anchor as isize + shift).max(0) as usize;
    let target = state.store.last_index().map_or(0, |last| target.min(last));
    info!(fetched, shift, anchor, target, "Prepended older rows, re-anchoring");

    let mut effects = vec![Effect::InvalidateFrom(0)];
    if !state.store.is_empty() {
        effects.push(Effect::ScrollToIndex {
            index: target,
            align: Align::Start,
        });
    }
    (state, effects)
}

fn on_newer_loaded(
    mut state: PaginationState,
    request: FetchRequest,
    rows: Vec<Row>,
    config: &PaginationConfig,
) -> (PaginationState, Vec<Effect>) {
    if !state.flags.is_loading_newer_rows {
        warn!(rows = rows.len(), "Dropping stale newer-rows completion");
        return (state, Vec::new());
    }
    state.flags.is_loading_newer_rows = false;

    let previous_stop = state.window.visible_stop_index();
    let appended = state.store.append_at_tail(rows);
    debug!(appended, origin = ?request.origin, "Appended newer rows");

    let mut effects = Vec::new();
    if state.flags.is_tailing {
        if let Some(last) = state.store.last_index() {
            effects.push(Effect::ScrollToIndex {
                index: last,
                align: Align::End,
            });
        }
    } else if request.origin == FetchOrigin::Edge && config.reanchor_newer {
        if let Some(stop) = previous_stop {
            effects.push(Effect::ScrollToIndex {
                index: stop,
                align: Align::End,
            });
        }
    }
    (state, effects)
}

fn on_fetch_failed(
    mut state: PaginationState,
    request: FetchRequest,
    error: FetchError,
) -> (PaginationState, Vec<Effect>) {
    let mut effects = Vec::new();
    match request.direction {
        FetchDirection::Older if state.flags.is_loading_older_rows => {
            state.flags.is_loading_older_rows = false;
            let reserved = std::mem::take(&mut state.reserved_head);
            let reserved = reserved.min(state.store.leading_placeholders());
            if reserved > 0 {
                let removed = state.store.remove_head(reserved);
                let anchor = state.window.visible_start_index().saturating_sub(removed);
                effects.push(Effect::InvalidateFrom(0));
                if !state.store.is_empty() {
                    effects.push(Effect::ScrollToIndex {
                        index: anchor,
                        align: Align::Start,
                    });
                }
            }
        }
        FetchDirection::Newer if state.flags.is_loading_newer_rows => {
            state.flags.is_loading_newer_rows = false;
        }
        _ => {
            warn!(direction = %request.direction, "Dropping stale fetch failure");
            return (state, effects);
        }
    }

    warn!(direction = %request.direction, error = %error, "Fetch failed, store unchanged");
    effects.push(Effect::Report(EngineError::Fetch(error)));
    (state, effects)
}

fn on_tail_tick(
    mut state: PaginationState,
    config: &PaginationConfig,
) -> (PaginationState, Vec<Effect>) {
    if !state.flags.is_tailing || state.flags.is_loading_newer_rows {
        return (state, Vec::new());
    }
    state.flags.is_loading_newer_rows = true;
    let effects = vec![Effect::Fetch(FetchRequest {
        direction: FetchDirection::Newer,
        count: config.batch_size,
        origin: FetchOrigin::Tail,
    })];
    (state, effects)
}

fn on_follow_latest(
    mut state: PaginationState,
    config: &PaginationConfig,
) -> (PaginationState, Vec<Effect>) {
    let mut effects = Vec::new();
    if let Some(last) = state.store.last_index() {
        effects.push(Effect::ScrollToIndex {
            index: last,
            align: Align::End,
        });
    }
    if !state.flags.is_tailing {
        state.flags.is_tailing = true;
        effects.push(Effect::StartTailing(config.tail_interval));
    }
    (state, effects)
}

/// Owns the pagination state and applies transitions in place.
#[derive(Debug, Clone)]
pub struct PaginationController {
    config: PaginationConfig,
    state: PaginationState,
}

impl PaginationController {
    /// Controller over an initial store.
    pub fn new(store: LogStore, config: PaginationConfig) -> Self {
        Self {
            config,
            state: PaginationState::new(store),
        }
    }

    /// Apply one event, returning the effects to carry out.
    pub fn dispatch(&mut self, event: PaginationEvent) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = transition(state, event, &self.config);
        self.state = state;
        effects
    }

    /// Current configuration.
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Row store (read-only; mutations go through events).
    pub fn store(&self) -> &LogStore {
        &self.state.store
    }

    /// Flight flags.
    pub fn flags(&self) -> FlightFlags {
        self.state.flags
    }

    /// Last window observed by the machine.
    pub fn window(&self) -> &WindowState {
        &self.state.window
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
