//! Row height estimation from a calibration table.
//!
//! Calibration renders `N` synthetic samples whose lengths are multiples of
//! the characters that fit on one line, and records the measured height of
//! each. Any row is then estimated by the first sample strictly longer than
//! its message; rows longer than the largest sample are clamped to the
//! largest sample's height. This trades exactness for an O(log N) lookup.

use crate::model::{CalibrationError, Row};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Default number of calibration samples.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Failure reported by a measurement collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MeasureError(pub String);

/// Measurement primitives supplied by the presentation layer.
#[async_trait]
pub trait TextMeasurer: Send + Sync {
    /// Width of `text` rendered in `font`.
    fn text_width(&self, text: &str, font: &str) -> Result<f64, MeasureError>;

    /// Height of `text` once laid out in a container `container_width` wide.
    ///
    /// Asynchronous because a real host needs a layout pass.
    async fn rendered_height(&self, text: &str, container_width: usize)
        -> Result<usize, MeasureError>;
}

/// One calibration bucket: messages up to `char_length` render `height` tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSample {
    /// Sample length in characters.
    pub char_length: usize,
    /// Measured height.
    pub height: usize,
}

/// Calibration table for one viewport-metrics epoch.
///
/// # Invariants
/// - `samples` is non-empty and strictly ascending by `char_length`
/// - heights are non-decreasing along `samples`
#[derive(Debug, Clone, PartialEq)]
pub struct HeightCache {
    samples: Vec<CalibrationSample>,
    char_width: f64,
    chars_per_line: usize,
}

impl HeightCache {
    /// Build a cache from raw samples.
    ///
    /// Samples are ordered numerically by length. A sample whose length does
    /// not strictly exceed the previous one is skipped, so ties resolve to
    /// the sample reached first. Heights are raised to the running maximum.
    ///
    /// # Errors
    ///
    /// `CalibrationError::NoSamples` if `samples` is empty.
    pub fn from_samples(
        mut samples: Vec<CalibrationSample>,
        char_width: f64,
        chars_per_line: usize,
    ) -> Result<Self, CalibrationError> {
        // Stable sort keeps the first-reached sample of a tie in front
        samples.sort_by_key(|s| s.char_length);

        let mut ordered: Vec<CalibrationSample> = Vec::with_capacity(samples.len());
        for sample in samples {
            match ordered.last() {
                Some(prev) if sample.char_length <= prev.char_length => continue,
                Some(prev) => ordered.push(CalibrationSample {
                    char_length: sample.char_length,
                    height: sample.height.max(prev.height),
                }),
                None => ordered.push(sample),
            }
        }

        if ordered.is_empty() {
            return Err(CalibrationError::NoSamples);
        }

        Ok(Self {
            samples: ordered,
            char_width,
            chars_per_line,
        })
    }

    /// Calibration buckets, ascending.
    pub fn samples(&self) -> &[CalibrationSample] {
        &self.samples
    }

    /// Measured width of one character.
    pub fn char_width(&self) -> f64 {
        self.char_width
    }

    /// Characters fitting on one line.
    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    /// Height of the smallest bucket; used as filler height for placeholders.
    pub fn line_height(&self) -> usize {
        self.samples[0].height
    }

    /// Estimated height of a row.
    pub fn estimate(&self, row: &Row) -> usize {
        if row.is_placeholder() {
            return self.line_height();
        }
        self.estimate_len(row.message_len())
    }

    /// Estimated height of a message of `len` characters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logwindow::view_state::height_estimator::{CalibrationSample, HeightCache};
    /// let samples = (1..=3)
    ///     .map(|k| CalibrationSample { char_length: k * 100, height: k * 20 })
    ///     .collect();
    /// let cache = HeightCache::from_samples(samples, 7.0, 100).unwrap();
    /// assert_eq!(cache.estimate_len(99), 20);
    /// assert_eq!(cache.estimate_len(100), 40); // strictly greater bucket
    /// assert_eq!(cache.estimate_len(10_000), 60); // clamped high
    /// ```
    pub fn estimate_len(&self, len: usize) -> usize {
        let idx = self.samples.partition_point(|s| s.char_length <= len);
        self.samples
            .get(idx)
            .or_else(|| self.samples.last())
            .map(|s| s.height)
            .unwrap_or_default()
    }
}

/// Characters per line for a container, clamped to at least one.
pub fn chars_per_line(container_width: usize, char_width: f64) -> usize {
    ((container_width as f64 / char_width).floor() as usize).max(1)
}

/// Builds height caches by rendering synthetic samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightEstimator {
    font: String,
    sample_count: usize,
}

impl HeightEstimator {
    /// Create an estimator for `font` building `sample_count` buckets.
    pub fn new(font: impl Into<String>, sample_count: usize) -> Self {
        Self {
            font: font.into(),
            sample_count,
        }
    }

    /// Font used for measurement.
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Number of buckets built per calibration.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Measure samples of `k * chars_per_line` characters for `k = 1..=N`.
    ///
    /// The result must be awaited before the cache is trusted.
    ///
    /// # Errors
    ///
    /// - `InvalidCharWidth` if the single-character width is not a positive number
    /// - `Measurement` if any sample fails to render
    /// - `NoSamples` if the estimator was configured with zero samples
    pub async fn calibrate<M>(
        &self,
        container_width: usize,
        measurer: &M,
    ) -> Result<HeightCache, CalibrationError>
    where
        M: TextMeasurer + ?Sized,
    {
        if self.sample_count == 0 {
            return Err(CalibrationError::NoSamples);
        }

        // Monospace assumption: any single glyph gives the advance width
        let char_width =
            measurer
                .text_width("x", &self.font)
                .map_err(|e| CalibrationError::Measurement {
                    char_length: 1,
                    reason: e.0,
                })?;
        if !char_width.is_finite() || char_width <= 0.0 {
            return Err(CalibrationError::InvalidCharWidth {
                width: char_width,
                font: self.font.clone(),
            });
        }

        let per_line = chars_per_line(container_width, char_width);
        let mut samples = Vec::with_capacity(self.sample_count);
        for k in 1..=self.sample_count {
            let char_length = k * per_line;
            let text = "x".repeat(char_length);
            let height = measurer
                .rendered_height(&text, container_width)
                .await
                .map_err(|e| CalibrationError::Measurement {
                    char_length,
                    reason: e.0,
                })?;
            samples.push(CalibrationSample {
                char_length,
                height,
            });
        }

        debug!(
            container_width,
            char_width,
            chars_per_line = per_line,
            samples = samples.len(),
            "Calibration samples measured"
        );

        HeightCache::from_samples(samples, char_width, per_line)
    }
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::new("13px monospace", DEFAULT_SAMPLE_COUNT)
    }
}

#[cfg(test)]
#[path = "height_estimator_tests.rs"]
mod tests;
