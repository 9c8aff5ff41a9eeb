//! Ordered row storage.
//!
//! Index 0 is the oldest loaded row. Any head insertion shifts every existing
//! index by the inserted count, so callers must never hold a raw index across
//! a mutation; re-derive it from counts instead.

use super::error::EngineError;
use super::row::Row;
use std::collections::VecDeque;

/// The ordered sequence of rows, placeholders included.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    rows: VecDeque<Row>,
}

impl LogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from rows in chronological order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the newest row.
    pub fn last_index(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    /// Row at `index`.
    ///
    /// # Errors
    ///
    /// `EngineError::IndexOutOfRange` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&Row, EngineError> {
        self.rows.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Iterate rows oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Insert rows (chronological order) before the current oldest row.
    ///
    /// Returns the number of rows inserted, which is also the shift applied
    /// to every pre-existing index.
    pub fn insert_at_head(&mut self, rows: Vec<Row>) -> usize {
        let count = rows.len();
        for row in rows.into_iter().rev() {
            self.rows.push_front(row);
        }
        count
    }

    /// Append rows (chronological order) after the newest row.
    pub fn append_at_tail(&mut self, rows: Vec<Row>) -> usize {
        let count = rows.len();
        self.rows.extend(rows);
        count
    }

    /// Replace the first `count` rows with `rows`.
    ///
    /// Used to swap a reserved block of head placeholders for fetched rows.
    /// `count` is clamped to the store length. Returns the signed shift
    /// applied to every row after the replaced block.
    pub fn replace_head(&mut self, count: usize, rows: Vec<Row>) -> isize {
        let removed = count.min(self.rows.len());
        self.rows.drain(..removed);
        let inserted = self.insert_at_head(rows);
        inserted as isize - removed as isize
    }

    /// Remove the first `count` rows, returning how many were removed.
    pub fn remove_head(&mut self, count: usize) -> usize {
        let removed = count.min(self.rows.len());
        self.rows.drain(..removed);
        removed
    }

    /// Number of consecutive placeholders at the head of the store.
    pub fn leading_placeholders(&self) -> usize {
        self.rows.iter().take_while(|r| r.is_placeholder()).count()
    }
}
