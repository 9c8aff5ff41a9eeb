//! Async shell around the engine.
//!
//! The driver turns [`Command`]s into tokio work: fetches and calibrations run
//! as spawned tasks that report back over an unbounded channel, the tail poll
//! is a `tokio::time::Interval`, and the resize debounce is a single wake-up
//! deadline. [`Driver::next_event`] waits on all three and is cancel-safe, so
//! a host can race it against its own input stream in `tokio::select!`.
//!
//! Completions are applied one at a time in arrival order; the engine is
//! never touched from a spawned task.

use crate::model::{FetchError, LogStore};
use crate::source::RowFetcher;
use crate::state::{Command, Engine, EngineConfig, EngineEvent, FetchRequest};
use crate::view_state::{Align, CalibrationRequest, TextMeasurer, ViewportDimensions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Driver tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverConfig {
    /// Fail a fetch with `TimedOut` after this long; `None` waits forever.
    pub fetch_timeout: Option<Duration>,
}

/// Input originating from the host rather than from async work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    /// The container changed size.
    Resized(ViewportDimensions),
    /// The user scrolled to an offset.
    Scrolled(usize),
    /// Show a row.
    ScrollToIndex {
        /// Target row.
        index: usize,
        /// Target placement.
        align: Align,
    },
    /// Jump to the newest row and follow it.
    FollowLatest,
}

/// Runs engine commands on the tokio runtime.
pub struct Driver {
    engine: Engine,
    config: DriverConfig,
    fetcher: Arc<dyn RowFetcher>,
    measurer: Arc<dyn TextMeasurer>,
    tx: mpsc::UnboundedSender<EngineEvent>,
    rx: mpsc::UnboundedReceiver<EngineEvent>,
    tail: Option<Interval>,
    wake: Option<Instant>,
}

impl Driver {
    /// Build an engine over `store` and wrap it.
    pub fn new(
        engine_config: EngineConfig,
        config: DriverConfig,
        dimensions: ViewportDimensions,
        store: LogStore,
        fetcher: Arc<dyn RowFetcher>,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            engine: Engine::new(engine_config, dimensions, store),
            config,
            fetcher,
            measurer,
            tx,
            rx,
            tail: None,
            wake: None,
        }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// True while the tail poll is scheduled.
    pub fn is_polling(&self) -> bool {
        self.tail.is_some()
    }

    /// Kick off the first calibration. Must be called inside a runtime.
    pub fn start(&mut self) {
        let commands = self.engine.start();
        self.execute(commands);
    }

    /// Apply host input immediately.
    pub fn input(&mut self, input: HostInput) {
        let event = match input {
            HostInput::Resized(dimensions) => EngineEvent::Resized {
                dimensions,
                at: Instant::now().into_std(),
            },
            HostInput::Scrolled(offset) => EngineEvent::Scrolled { offset },
            HostInput::ScrollToIndex { index, align } => EngineEvent::ScrollToIndex { index, align },
            HostInput::FollowLatest => EngineEvent::FollowLatest,
        };
        self.apply(event);
    }

    /// Apply an event and run the commands it produces.
    pub fn apply(&mut self, event: EngineEvent) {
        let commands = self.engine.handle(event);
        self.execute(commands);
    }

    /// Wait for the next completion, tail tick or resize deadline.
    ///
    /// Cancel-safe: dropping the future loses nothing.
    pub async fn next_event(&mut self) -> EngineEvent {
        let wake = self.wake;
        tokio::select! {
            Some(event) = self.rx.recv() => event,
            _ = next_tick(&mut self.tail) => EngineEvent::TailTick,
            _ = sleep_until(wake) => {
                self.wake = None;
                EngineEvent::ResizeDeadline { at: Instant::now().into_std() }
            }
        }
    }

    /// Wait for and apply one event.
    pub async fn step(&mut self) {
        let event = self.next_event().await;
        self.apply(event);
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Calibrate(request) => self.spawn_calibration(request),
                Command::Fetch(request) => self.spawn_fetch(request),
                Command::StartTailTimer(period) => {
                    info!(?period, "Tail poll started");
                    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.tail = Some(interval);
                }
                Command::StopTailTimer => {
                    if self.tail.take().is_some() {
                        info!("Tail poll cancelled");
                    }
                }
                Command::WakeAt(deadline) => {
                    self.wake = Some(Instant::from_std(deadline));
                }
            }
        }
    }

    fn spawn_calibration(&self, request: CalibrationRequest) {
        let estimator = self.engine.estimator().clone();
        let measurer = Arc::clone(&self.measurer);
        let tx = self.tx.clone();
        debug!(epoch = request.epoch, width = request.width, "Calibration started");
        tokio::spawn(async move {
            let result = estimator.calibrate(request.width, measurer.as_ref()).await;
            let _ = tx.send(EngineEvent::CalibrationFinished {
                epoch: request.epoch,
                result,
            });
        });
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let timeout = self.config.fetch_timeout;
        let tx = self.tx.clone();
        debug!(direction = %request.direction, count = request.count, "Fetch issued");
        tokio::spawn(async move {
            let task = tokio::spawn(async move {
                let fetch = fetcher.fetch(request.direction, request.count);
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, fetch)
                        .await
                        .unwrap_or(Err(FetchError::TimedOut(limit))),
                    None => fetch.await,
                }
            });
            let result = task.await.unwrap_or(Err(FetchError::Aborted));
            let event = match result {
                Ok(rows) => EngineEvent::FetchCompleted { request, rows },
                Err(error) => EngineEvent::FetchFailed { request, error },
            };
            let _ = tx.send(event);
        });
    }
}

async fn next_tick(tail: &mut Option<Interval>) {
    match tail {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
