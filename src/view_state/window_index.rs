//! Windowed rendering over variable-height rows.
//!
//! `WindowIndex` memoizes estimated row heights in a [`HeightIndex`] and turns
//! a scroll offset into a [`VisibleRange`]. Heights are filled lazily by
//! [`WindowIndex::sync`]; any change to a row's height (recalibration, head
//! insertion, placeholder replacement) must be followed by
//! [`WindowIndex::invalidate_from`] because it shifts every later offset.
//!
//! Scroll state lives in an explicit [`WindowState`] value updated through
//! pure transitions, so direction tracking is testable without a host.

use super::height_index::HeightIndex;
use super::types::{Align, ScrollDirection, ViewportDimensions};
use super::visible_range::VisibleRange;
use crate::model::EngineError;

/// Default number of rows rendered beyond each edge of the visible range.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Scroll and visibility state of the window.
///
/// Recomputed on every scroll, resize, and store mutation; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    /// Container height.
    pub container_height: usize,
    /// Container width.
    pub container_width: usize,
    /// Visible and overscanned rows.
    pub range: VisibleRange,
    /// Current scroll offset.
    pub scroll_offset: usize,
    /// Direction of the last user scroll; `Neutral` after a programmatic jump.
    pub scroll_direction: ScrollDirection,
    /// Last observed offset, the reference for the next direction inference.
    last_observed: Option<usize>,
}

impl WindowState {
    /// First strictly visible row.
    pub fn visible_start_index(&self) -> usize {
        self.range.start
    }

    /// Last strictly visible row, `None` when nothing is visible.
    pub fn visible_stop_index(&self) -> Option<usize> {
        self.range.last()
    }

    /// Transition for a user scroll to `offset`.
    pub fn observe_scroll(self, offset: usize, range: VisibleRange) -> Self {
        Self {
            range,
            scroll_offset: offset,
            scroll_direction: ScrollDirection::infer(self.last_observed, offset),
            last_observed: Some(offset),
            ..self
        }
    }

    /// Transition for a programmatic jump to `offset`.
    ///
    /// The jump is never attributed a direction, and direction tracking
    /// restarts from the jump target.
    pub fn jump(self, offset: usize, range: VisibleRange) -> Self {
        Self {
            range,
            scroll_offset: offset,
            scroll_direction: ScrollDirection::Neutral,
            last_observed: Some(offset),
            ..self
        }
    }

    /// Transition for a container resize.
    pub fn resize(self, dimensions: ViewportDimensions) -> Self {
        Self {
            container_height: dimensions.height,
            container_width: dimensions.width,
            ..self
        }
    }
}

/// Position handed to the presentation layer for one rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    /// Row index in the store.
    pub index: usize,
    /// Absolute offset of the row's top edge.
    pub top: usize,
    /// Estimated row height.
    pub height: usize,
}

/// Maps scroll offsets to row indices using memoized estimated heights.
#[derive(Debug, Clone)]
pub struct WindowIndex {
    heights: HeightIndex,
    overscan: usize,
    state: WindowState,
}

impl WindowIndex {
    /// Create an empty window for a container.
    pub fn new(dimensions: ViewportDimensions, overscan: usize) -> Self {
        Self {
            heights: HeightIndex::new(1024),
            overscan,
            state: WindowState::default().resize(dimensions),
        }
    }

    /// Current window state.
    pub fn state(&self) -> &WindowState {
        &self.state
    }

    /// Rows rendered beyond each edge.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Number of rows with memoized heights.
    pub fn measured_len(&self) -> usize {
        self.heights.len()
    }

    /// Discard memoized heights at or after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        self.heights.truncate(index);
    }

    /// Memoize heights for rows `measured_len()..row_count`.
    ///
    /// Rows beyond `row_count` (the store shrank) are discarded first.
    pub fn sync<F>(&mut self, row_count: usize, mut estimate: F)
    where
        F: FnMut(usize) -> usize,
    {
        self.heights.truncate(row_count);
        for index in self.heights.len()..row_count {
            self.heights.push(estimate(index));
        }
    }

    /// Sum of all memoized heights.
    pub fn total_height(&self) -> usize {
        self.heights.total()
    }

    /// Largest offset that still fills the container.
    pub fn max_scroll_offset(&self) -> usize {
        self.total_height()
            .saturating_sub(self.state.container_height)
    }

    /// Offset of the top edge of `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index` has no memoized height.
    pub fn row_offset(&self, index: usize) -> Result<usize, EngineError> {
        self.check(index)?;
        Ok(self.heights.offset_of(index))
    }

    /// Memoized height of `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index` has no memoized height.
    pub fn row_height(&self, index: usize) -> Result<usize, EngineError> {
        self.heights.height(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.heights.len(),
        })
    }

    /// Rows covering `[scroll_offset, scroll_offset + container_height)`.
    ///
    /// The first visible row satisfies
    /// `offset_of(start) <= scroll_offset < offset_of(start + 1)`.
    /// Offsets past the end resolve to the last row.
    pub fn visible_range(&self, scroll_offset: usize) -> VisibleRange {
        let len = self.heights.len();
        if len == 0 {
            return VisibleRange::default();
        }

        let last = len - 1;
        let start = self.heights.lower_bound(scroll_offset).unwrap_or(last);
        let bottom = scroll_offset.saturating_add(self.state.container_height);
        let stop = self
            .heights
            .lower_bound(bottom.saturating_sub(1))
            .unwrap_or(last)
            .max(start);

        VisibleRange::new(start, stop + 1, self.overscan, len)
    }

    /// Offset that places `index` according to `align`, clamped to the scrollable range.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index` has no memoized height.
    pub fn offset_for_index(&self, index: usize, align: Align) -> Result<usize, EngineError> {
        let top = self.row_offset(index)?;
        let height = self.row_height(index)?;
        let container = self.state.container_height;

        let target = match align {
            Align::Start => top,
            Align::End => (top + height).saturating_sub(container),
            Align::Center => (top + height / 2).saturating_sub(container / 2),
        };
        Ok(target.min(self.max_scroll_offset()))
    }

    /// User scroll to `offset`. Infers direction from the previous offset.
    pub fn on_scroll(&mut self, offset: usize) -> &WindowState {
        let offset = offset.min(self.max_scroll_offset());
        let range = self.visible_range(offset);
        self.state = self.state.observe_scroll(offset, range);
        &self.state
    }

    /// Programmatic jump placing `index` per `align`.
    ///
    /// Calling this twice with no intervening mutation yields the same offset.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index` has no memoized height.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Result<&WindowState, EngineError> {
        let offset = self.offset_for_index(index, align)?;
        let range = self.visible_range(offset);
        self.state = self.state.jump(offset, range);
        Ok(&self.state)
    }

    /// Recompute the range at the current offset after heights changed.
    ///
    /// Nothing moved on the user's behalf, so the direction becomes `Neutral`;
    /// the reference offset for the next inference is kept.
    pub fn refresh(&mut self) -> &WindowState {
        let offset = self.state.scroll_offset.min(self.max_scroll_offset());
        self.state.scroll_offset = offset;
        self.state.range = self.visible_range(offset);
        self.state.scroll_direction = ScrollDirection::Neutral;
        &self.state
    }

    /// Update container dimensions and recompute the range.
    pub fn resize(&mut self, dimensions: ViewportDimensions) -> &WindowState {
        self.state = self.state.resize(dimensions);
        self.refresh()
    }

    /// Slots for every rendered (overscanned) row.
    pub fn rendered_slots(&self) -> impl Iterator<Item = RowSlot> + '_ {
        self.state.range.rendered().filter_map(move |index| {
            let height = self.heights.height(index)?;
            Some(RowSlot {
                index,
                top: self.heights.offset_of(index),
                height,
            })
        })
    }

    fn check(&self, index: usize) -> Result<(), EngineError> {
        if index < self.heights.len() {
            Ok(())
        } else {
            Err(EngineError::IndexOutOfRange {
                index,
                len: self.heights.len(),
            })
        }
    }
}

#[cfg(test)]
#[path = "window_index_tests.rs"]
mod tests;
