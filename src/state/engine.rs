//! Composition root for the list engine.
//!
//! `Engine` wires the viewport, the window index and the pagination machine
//! together. It is synchronous and performs no I/O: every input arrives as an
//! [`EngineEvent`] and every piece of async work leaves as a [`Command`] for
//! the driver to run. Completions come back as events, tagged with the request
//! or epoch they answer.
//!
//! Programmatic jumps requested by the pagination machine are applied here and
//! fed back as `WindowChanged`, so tail start/stop is re-evaluated after every
//! move, user-initiated or not. While no height cache is usable (before the
//! first calibration, or after a failed one) jumps are deferred until the next
//! successful epoch and tail polls are held; the tailing flag itself survives.

use super::pagination::{
    Effect, FetchRequest, FlightFlags, PaginationConfig, PaginationController, PaginationEvent,
};
use crate::model::{CalibrationError, EngineError, FetchError, LogStore, Row};
use crate::view_state::{
    Align, CalibrationRequest, CalibrationStatus, HeightCache, HeightEstimator, RowSlot, Viewport,
    ViewportDimensions, ViewportMetrics, WindowIndex, WindowState,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Engine tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Pagination thresholds, batch size and tailing.
    pub pagination: PaginationConfig,
    /// Rows rendered beyond each visible edge.
    pub overscan: usize,
    /// Trailing-edge debounce for resize bursts.
    pub resize_debounce: Duration,
    /// Font passed to the measurer.
    pub font: String,
    /// Calibration samples per epoch.
    pub calibration_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let estimator = HeightEstimator::default();
        Self {
            pagination: PaginationConfig::default(),
            overscan: crate::view_state::window_index::DEFAULT_OVERSCAN,
            resize_debounce: crate::view_state::viewport::DEFAULT_RESIZE_DEBOUNCE,
            font: estimator.font().to_string(),
            calibration_samples: estimator.sample_count(),
        }
    }
}

/// Input to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The container reported a new size.
    Resized {
        /// New container size.
        dimensions: ViewportDimensions,
        /// When the notification arrived.
        at: Instant,
    },
    /// A previously scheduled wake-up for the resize debounce fired.
    ResizeDeadline {
        /// Current time.
        at: Instant,
    },
    /// A calibration finished.
    CalibrationFinished {
        /// Epoch of the request.
        epoch: u64,
        /// Built cache or failure.
        result: Result<HeightCache, CalibrationError>,
    },
    /// The user scrolled to an offset.
    Scrolled {
        /// New scroll offset.
        offset: usize,
    },
    /// The host asked to show a row.
    ScrollToIndex {
        /// Target row.
        index: usize,
        /// Target placement.
        align: Align,
    },
    /// The host asked to jump to the newest row and follow it.
    FollowLatest,
    /// A fetch resolved.
    FetchCompleted {
        /// The request being answered.
        request: FetchRequest,
        /// Rows in chronological order.
        rows: Vec<Row>,
    },
    /// A fetch failed.
    FetchFailed {
        /// The request being answered.
        request: FetchRequest,
        /// Transport failure.
        error: FetchError,
    },
    /// The tail poll timer fired.
    TailTick,
}

/// Async work the driver must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a calibration and answer with `CalibrationFinished`.
    Calibrate(CalibrationRequest),
    /// Run a fetch and answer with `FetchCompleted` or `FetchFailed`.
    Fetch(FetchRequest),
    /// Start ticking `TailTick` at this period.
    StartTailTimer(Duration),
    /// Cancel the tail timer.
    StopTailTimer,
    /// Send `ResizeDeadline` at (or after) this instant, replacing any earlier wake-up.
    WakeAt(Instant),
}

/// Counters shown by the stats panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStats {
    /// Rows in the store.
    pub row_count: usize,
    /// Container and font metrics.
    pub metrics: ViewportMetrics,
    /// Calibration state.
    pub calibration: CalibrationStatus,
    /// Loading and tailing flags.
    pub flags: FlightFlags,
    /// Estimated height of all rows.
    pub total_height: usize,
    /// Current scroll offset.
    pub scroll_offset: usize,
}

/// Virtualized log list: state plus pure transitions.
#[derive(Debug, Clone)]
pub struct Engine {
    viewport: Viewport,
    estimator: HeightEstimator,
    window: WindowIndex,
    pagination: PaginationController,
    anchored: bool,
    deferred_jump: Option<(usize, Align)>,
    last_error: Option<EngineError>,
}

impl Engine {
    /// Engine over an initial store and container size.
    pub fn new(config: EngineConfig, dimensions: ViewportDimensions, store: LogStore) -> Self {
        Self {
            viewport: Viewport::new(dimensions, config.resize_debounce),
            estimator: HeightEstimator::new(config.font, config.calibration_samples),
            window: WindowIndex::new(dimensions, config.overscan),
            pagination: PaginationController::new(store, config.pagination),
            anchored: false,
            deferred_jump: None,
            last_error: None,
        }
    }

    /// Commands to run at startup: the first calibration.
    ///
    /// Once it lands the view jumps to the newest row and starts tailing.
    pub fn start(&mut self) -> Vec<Command> {
        vec![Command::Calibrate(self.viewport.begin_calibration())]
    }

    /// Apply one event.
    pub fn handle(&mut self, event: EngineEvent) -> Vec<Command> {
        let mut commands = Vec::new();
        match event {
            EngineEvent::Resized { dimensions, at } => {
                let deadline = self.viewport.on_resize(dimensions, at);
                commands.push(Command::WakeAt(deadline));
            }
            EngineEvent::ResizeDeadline { at } => {
                if let Some(request) = self.viewport.settle(at) {
                    self.window.resize(self.viewport.dimensions());
                    commands.push(Command::Calibrate(request));
                }
            }
            EngineEvent::CalibrationFinished { epoch, result } => {
                self.on_calibrated(epoch, result, &mut commands);
            }
            EngineEvent::Scrolled { offset } => {
                if self.viewport.height_cache().is_none() {
                    debug!(offset, "Ignoring scroll before calibration");
                    return commands;
                }
                self.sync_window();
                let state = *self.window.on_scroll(offset);
                self.dispatch(PaginationEvent::WindowChanged(state), &mut commands);
            }
            EngineEvent::ScrollToIndex { index, align } => {
                if self.viewport.height_cache().is_none() {
                    debug!(index, "Ignoring jump before calibration");
                    return commands;
                }
                self.jump(index, align, &mut commands);
            }
            EngineEvent::FollowLatest => {
                self.dispatch(PaginationEvent::FollowLatest, &mut commands);
            }
            EngineEvent::FetchCompleted { request, rows } => {
                self.dispatch(PaginationEvent::FetchCompleted { request, rows }, &mut commands);
            }
            EngineEvent::FetchFailed { request, error } => {
                self.dispatch(PaginationEvent::FetchFailed { request, error }, &mut commands);
            }
            EngineEvent::TailTick => {
                if !self.has_heights() {
                    debug!("Holding tail poll until heights are usable");
                    return commands;
                }
                self.dispatch(PaginationEvent::TailTick, &mut commands);
            }
        }
        commands
    }

    /// Estimator the driver uses for `Calibrate` commands.
    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    /// Row store.
    pub fn store(&self) -> &LogStore {
        self.pagination.store()
    }

    /// Current window state.
    pub fn window_state(&self) -> &WindowState {
        self.window.state()
    }

    /// Viewport and calibration state.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Loading and tailing flags.
    pub fn flags(&self) -> FlightFlags {
        self.pagination.flags()
    }

    /// Estimated height of all rows.
    pub fn total_height(&self) -> usize {
        self.window.total_height()
    }

    /// Most recent error surfaced by a fetch, calibration or jump.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// True until a usable height cache exists; the list is hidden meanwhile.
    pub fn is_loading(&self) -> bool {
        self.viewport.height_cache().is_none()
    }

    /// Rows to render with their estimated positions.
    pub fn rendered_rows(&self) -> Vec<(RowSlot, &Row)> {
        let store = self.pagination.store();
        self.window
            .rendered_slots()
            .filter_map(|slot| store.get(slot.index).ok().map(|row| (slot, row)))
            .collect()
    }

    /// Snapshot for the stats panel.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            row_count: self.pagination.store().len(),
            metrics: self.viewport.current_metrics(),
            calibration: self.viewport.status().clone(),
            flags: self.pagination.flags(),
            total_height: self.window.total_height(),
            scroll_offset: self.window.state().scroll_offset,
        }
    }

    fn on_calibrated(
        &mut self,
        epoch: u64,
        result: Result<HeightCache, CalibrationError>,
        commands: &mut Vec<Command>,
    ) {
        // A failed epoch leaves the window empty; fall back to the last window pagination saw
        let anchor = if self.window.measured_len() > 0 {
            self.window.state().visible_start_index()
        } else {
            self.pagination.window().visible_start_index()
        };
        let had_rows = !self.pagination.store().is_empty();
        if !self.viewport.finish_calibration(epoch, result) {
            return;
        }

        // Every memoized height belongs to the previous epoch
        self.window.invalidate_from(0);
        if let CalibrationStatus::Failed(err) = self.viewport.status() {
            let err = EngineError::Calibration(err.clone());
            self.window.refresh();
            self.report(err);
            return;
        }
        self.sync_window();
        let deferred = self.deferred_jump.take();

        if !self.anchored {
            self.anchored = true;
            self.dispatch(PaginationEvent::FollowLatest, commands);
        } else if self.pagination.flags().is_tailing {
            if let Some(last) = self.pagination.store().last_index() {
                self.jump(last, Align::End, commands);
            }
        } else if let Some((index, align)) = deferred {
            self.jump(index, align, commands);
        } else if had_rows {
            self.jump(anchor, Align::Start, commands);
        } else {
            self.window.refresh();
        }
    }

    fn jump(&mut self, index: usize, align: Align, commands: &mut Vec<Command>) {
        self.sync_window();
        match self.window.scroll_to_index(index, align) {
            Ok(state) => {
                let state = *state;
                self.dispatch(PaginationEvent::WindowChanged(state), commands);
            }
            Err(err) => self.report(err),
        }
    }

    /// Run a pagination event and every jump it causes to completion.
    fn dispatch(&mut self, event: PaginationEvent, commands: &mut Vec<Command>) {
        let mut queue = VecDeque::from([event]);
        loop {
            while let Some(event) = queue.pop_front() {
                for effect in self.pagination.dispatch(event) {
                    match effect {
                        Effect::Fetch(request) => commands.push(Command::Fetch(request)),
                        Effect::InvalidateFrom(index) => self.window.invalidate_from(index),
                        Effect::ScrollToIndex { index, align } if !self.has_heights() => {
                            debug!(index, "Deferring jump until heights are usable");
                            self.deferred_jump = Some((index, align));
                        }
                        Effect::ScrollToIndex { index, align } => {
                            self.sync_window();
                            match self.window.scroll_to_index(index, align) {
                                Ok(state) => {
                                    queue.push_back(PaginationEvent::WindowChanged(*state))
                                }
                                Err(err) => self.report(err),
                            }
                        }
                        Effect::StartTailing(interval) => {
                            commands.push(Command::StartTailTimer(interval))
                        }
                        Effect::StopTailing => commands.push(Command::StopTailTimer),
                        Effect::Report(err) => self.report(err),
                    }
                }
            }

            // Mutations without a jump can still change what is on screen
            if !self.has_heights() {
                break;
            }
            self.sync_window();
            let state = *self.window.refresh();
            let seen = self.pagination.window();
            if state.range == seen.range && state.scroll_offset == seen.scroll_offset {
                break;
            }
            queue.push_back(PaginationEvent::WindowChanged(state));
        }
    }

    fn has_heights(&self) -> bool {
        self.viewport.height_cache().is_some()
    }

    fn sync_window(&mut self) {
        let Some(cache) = self.viewport.height_cache() else {
            return;
        };
        let store = self.pagination.store();
        let filler = cache.line_height();
        self.window.sync(store.len(), |index| {
            store.get(index).map(|row| cache.estimate(row)).unwrap_or(filler)
        });
    }

    fn report(&mut self, err: EngineError) {
        warn!(error = %err, "Engine error");
        self.last_error = Some(err);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
