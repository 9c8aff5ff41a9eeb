//! View-state layer - height estimation, windowing and viewport metrics
//!
//! # Module Structure
//!
//! - `types`: Core types (ViewportDimensions, ScrollDirection, Align)
//! - `height_estimator`: HeightEstimator / HeightCache - calibrated row height prediction
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `viewport`: Viewport - container size, debounced resize, calibration epochs
//! - `visible_range`: VisibleRange - result of visible range calculation
//! - `window_index`: WindowIndex / WindowState - offset to index mapping, scroll-to-index

pub mod height_estimator;
pub mod height_index;
pub mod types;
pub mod viewport;
pub mod visible_range;
pub mod window_index;

pub use height_estimator::{CalibrationSample, HeightCache, HeightEstimator, MeasureError, TextMeasurer};
pub use types::{Align, ScrollDirection, ViewportDimensions};
pub use viewport::{CalibrationRequest, CalibrationStatus, Viewport, ViewportMetrics};
pub use visible_range::VisibleRange;
pub use window_index::{RowSlot, WindowIndex, WindowState};
