//! Error types for the log window engine.
//!
//! # Error Hierarchy
//!
//! - [`EngineError`] - failures raised by core operations
//!   - [`FetchError`] - the row transport rejected or timed out
//!   - [`CalibrationError`] - the measurement collaborator failed
//!   - `IndexOutOfRange` - a caller asked for a row beyond the store
//! - [`AppError`] - top-level binary error (config, logging, terminal)
//!
//! # Recovery Strategy
//!
//! Fetch failures are local: the loading flag is cleared, the store is left
//! unchanged and the next qualifying scroll re-triggers the fetch. There is no
//! automatic retry.
//!
//! Calibration failures are fatal for their epoch. No heights are usable, so
//! the viewport stays in its loading state and the error is surfaced instead
//! of falling back to guessed heights.
//!
//! `IndexOutOfRange` is a programming error in the caller.

use std::time::Duration;
use thiserror::Error;

/// Error raised by a core engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The row transport failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The measurement collaborator failed during calibration.
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),

    /// Requested index is beyond the current store bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use logwindow::model::error::EngineError;
    ///
    /// let err = EngineError::IndexOutOfRange { index: 12, len: 10 };
    /// assert!(err.to_string().contains("12"));
    /// ```
    #[error("Index {index} out of range (len: {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Store length at the time of the request.
        len: usize,
    },
}

/// Failure reported by a `RowFetcher`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport rejected the request.
    #[error("Transport rejected request: {0}")]
    Rejected(String),

    /// The transport did not answer in time.
    #[error("Transport timed out after {0:?}")]
    TimedOut(Duration),

    /// The fetch task was dropped before producing a result.
    #[error("Fetch task ended without a result")]
    Aborted,
}

/// Failure while building a height cache.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// The measured width of a single character was zero, negative, or not finite.
    #[error("Invalid character width {width} for font {font:?}")]
    InvalidCharWidth {
        /// The measured width.
        width: f64,
        /// The font that was measured.
        font: String,
    },

    /// The measurement collaborator could not measure a sample.
    #[error("Could not measure sample of {char_length} chars: {reason}")]
    Measurement {
        /// Length of the sample being measured.
        char_length: usize,
        /// Reason reported by the collaborator.
        reason: String,
    },

    /// Calibration was asked to build zero samples.
    #[error("Calibration needs at least one sample")]
    NoSamples,
}

/// Top-level application error for the `logwindow` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal UI failure.
    #[error("Terminal UI error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// Terminal or runtime I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_converts_into_engine_error() {
        let err: EngineError = FetchError::Rejected("503".to_string()).into();
        assert!(matches!(err, EngineError::Fetch(FetchError::Rejected(_))));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn calibration_error_converts_into_engine_error() {
        let err: EngineError = CalibrationError::NoSamples.into();
        assert_eq!(err, EngineError::Calibration(CalibrationError::NoSamples));
    }

    #[test]
    fn index_out_of_range_reports_both_numbers() {
        let msg = EngineError::IndexOutOfRange { index: 7, len: 3 }.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn timed_out_mentions_duration() {
        let msg = FetchError::TimedOut(Duration::from_millis(500)).to_string();
        assert!(msg.contains("500ms"), "got: {msg}");
    }

    #[test]
    fn invalid_char_width_mentions_font() {
        let err = CalibrationError::InvalidCharWidth {
            width: 0.0,
            font: "13px monospace".to_string(),
        };
        assert!(err.to_string().contains("13px monospace"));
    }
}
