//! Visible range calculation result

use std::ops::Range;

/// Range of rows visible in the current viewport, plus the overscanned band.
///
/// Computed via binary search on cumulative heights.
/// Indices are into the log store.
///
/// # Invariants
/// - `start <= end`, `overscan_start <= start`, `end <= overscan_end`
/// - every row in `start..end` has some portion inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// Index of first visible row (inclusive).
    pub start: usize,
    /// Index past the last visible row (exclusive).
    pub end: usize,
    /// First row to render, including overscan (inclusive).
    pub overscan_start: usize,
    /// Past the last row to render, including overscan (exclusive).
    pub overscan_end: usize,
}

impl VisibleRange {
    /// Create a visible range, widening it by `overscan` rows on each side
    /// without going past `row_count`.
    ///
    /// # Panics
    /// In debug builds, panics if `start > end`.
    pub fn new(start: usize, end: usize, overscan: usize, row_count: usize) -> Self {
        debug_assert!(start <= end, "start {} > end {}", start, end);
        Self {
            start,
            end,
            overscan_start: start.saturating_sub(overscan),
            overscan_end: end.saturating_add(overscan).min(row_count).max(end),
        }
    }

    /// Number of strictly visible rows.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Index of the last visible row.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    /// Check if a row is strictly visible.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Rows to render, overscan included.
    pub fn rendered(&self) -> Range<usize> {
        self.overscan_start..self.overscan_end
    }
}
