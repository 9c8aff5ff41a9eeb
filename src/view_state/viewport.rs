//! Container dimensions, font metrics and calibration epochs.
//!
//! Resize notifications are debounced on the trailing edge: every
//! notification pushes the deadline out, and calibration starts only once the
//! burst has been quiet for the debounce window. Each settled resize opens a
//! new calibration epoch; results from an older epoch are discarded.

use super::height_estimator::HeightCache;
use super::types::ViewportDimensions;
use crate::model::CalibrationError;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default trailing-edge debounce window for resize bursts.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Calibration lifecycle of the viewport.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CalibrationStatus {
    /// No calibration has been requested yet.
    #[default]
    Uncalibrated,
    /// A calibration for the current epoch is running.
    Calibrating,
    /// The active height cache matches the current epoch.
    Ready,
    /// Calibration for the current epoch failed; no heights are usable.
    Failed(CalibrationError),
}

/// A calibration the host must run for `width`, tagged with its epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationRequest {
    /// Epoch the result belongs to.
    pub epoch: u64,
    /// Container width to calibrate against.
    pub width: usize,
}

/// Snapshot of the current viewport metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Container width.
    pub width: usize,
    /// Container height.
    pub height: usize,
    /// Characters per line from the active cache (0 before calibration).
    pub chars_per_line: usize,
    /// Character width from the active cache (0 before calibration).
    pub char_width: f64,
    /// Smallest bucket height from the active cache (0 before calibration).
    pub line_height: usize,
}

/// Tracks container size and owns the active height cache.
#[derive(Debug, Clone)]
pub struct Viewport {
    dimensions: ViewportDimensions,
    debounce: Duration,
    pending: Option<(ViewportDimensions, Instant)>,
    epoch: u64,
    status: CalibrationStatus,
    cache: Option<HeightCache>,
}

impl Viewport {
    /// Create a viewport with initial dimensions and a resize debounce window.
    pub fn new(dimensions: ViewportDimensions, debounce: Duration) -> Self {
        Self {
            dimensions,
            debounce,
            pending: None,
            epoch: 0,
            status: CalibrationStatus::Uncalibrated,
            cache: None,
        }
    }

    /// Current (settled) container dimensions.
    pub fn dimensions(&self) -> ViewportDimensions {
        self.dimensions
    }

    /// Current calibration epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Calibration status.
    pub fn status(&self) -> &CalibrationStatus {
        &self.status
    }

    /// True while a calibration is outstanding.
    pub fn is_calibrating(&self) -> bool {
        self.status == CalibrationStatus::Calibrating
    }

    /// The active height cache, if any calibration has succeeded.
    pub fn height_cache(&self) -> Option<&HeightCache> {
        self.cache.as_ref()
    }

    /// Record a resize notification at `now`.
    ///
    /// Returns the new trailing-edge deadline after which [`Viewport::settle`]
    /// will start a calibration.
    pub fn on_resize(&mut self, dimensions: ViewportDimensions, now: Instant) -> Instant {
        let deadline = now + self.debounce;
        self.pending = Some((dimensions, deadline));
        deadline
    }

    /// Deadline of the pending resize burst, if any.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Apply the pending resize once its burst has settled.
    ///
    /// Returns the calibration to run, or `None` if nothing is pending or
    /// the debounce window has not elapsed yet.
    pub fn settle(&mut self, now: Instant) -> Option<CalibrationRequest> {
        let (dimensions, deadline) = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;
        self.dimensions = dimensions;
        debug!(
            width = dimensions.width,
            height = dimensions.height,
            "Resize burst settled"
        );
        Some(self.begin_calibration())
    }

    /// Open a new epoch and request calibration for the current width.
    pub fn begin_calibration(&mut self) -> CalibrationRequest {
        self.epoch += 1;
        self.status = CalibrationStatus::Calibrating;
        CalibrationRequest {
            epoch: self.epoch,
            width: self.dimensions.width,
        }
    }

    /// Install a calibration result.
    ///
    /// Returns `true` if the result belonged to the current epoch and was
    /// applied. On success the previous cache is replaced wholesale; on
    /// failure the cache is dropped and the viewport stays unusable until
    /// the next resize.
    pub fn finish_calibration(
        &mut self,
        epoch: u64,
        result: Result<HeightCache, CalibrationError>,
    ) -> bool {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "Discarding stale calibration");
            return false;
        }
        match result {
            Ok(cache) => {
                info!(
                    epoch,
                    chars_per_line = cache.chars_per_line(),
                    line_height = cache.line_height(),
                    "Calibration complete"
                );
                self.cache = Some(cache);
                self.status = CalibrationStatus::Ready;
            }
            Err(err) => {
                warn!(epoch, error = %err, "Calibration failed");
                self.cache = None;
                self.status = CalibrationStatus::Failed(err);
            }
        }
        true
    }

    /// Current metrics, derived from the settled dimensions and active cache.
    pub fn current_metrics(&self) -> ViewportMetrics {
        let (chars_per_line, char_width, line_height) = self
            .cache
            .as_ref()
            .map(|c| (c.chars_per_line(), c.char_width(), c.line_height()))
            .unwrap_or((0, 0.0, 0));
        ViewportMetrics {
            width: self.dimensions.width,
            height: self.dimensions.height,
            chars_per_line,
            char_width,
            line_height,
        }
    }
}
