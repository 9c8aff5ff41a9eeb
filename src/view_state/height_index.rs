//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Holds the memoized per-row heights of the window index and answers
//! "where does row i start" and "which row covers offset y".
//!
//! # Complexity
//!
//! - `push`: O(log n) amortized
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `truncate`: O(k log n) for k discarded rows
//! - `total`, `len`, `height`: O(1)

/// Fenwick tree over row heights.
///
/// Only a prefix of the rows is ever held: rows at and after `len()` are
/// "not yet measured". Truncating discards that suffix and the tree nodes
/// that depend on it, which is what `invalidate_from` needs.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over `fenwick::array`).
    tree: Vec<isize>,
    /// Raw heights, kept for O(1) per-row lookup and rebuilds.
    heights: Vec<usize>,
    /// Running total of `heights`.
    total: usize,
}

impl HeightIndex {
    /// Creates a new HeightIndex with the given initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logwindow::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    /// Number of measured rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if no row is measured.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Sum of all measured heights.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Height of a measured row.
    pub fn height(&self, index: usize) -> Option<usize> {
        self.heights.get(index).copied()
    }

    /// Appends a row height.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logwindow::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(1);
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn push(&mut self, height: usize) {
        let idx = self.heights.len();
        self.heights.push(height);
        self.total += height;

        if idx >= self.tree.len() {
            // Nodes added by growth must cover earlier rows too; rebuild.
            let capacity = self.tree.len().max(1) * 2;
            self.rebuild(capacity.max(idx + 1));
        } else {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }

    /// Cumulative height up to and including `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logwindow::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Offset of the top edge of row `index` (sum of all rows before it).
    ///
    /// `offset_of(len())` is the total height.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else if index == self.len() {
            self.total
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// First index whose `prefix_sum(index) > value`, i.e. the row covering `value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logwindow::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10);  // [0..10)
    /// index.push(20);  // [10..30)
    /// index.push(15);  // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() || value >= self.total {
            return None;
        }

        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Discard every row at or after `index`.
    ///
    /// Fenwick node `j` only aggregates rows `<= j`, so removing the suffix
    /// means subtracting it from nodes `>= index` and leaving earlier nodes intact.
    pub fn truncate(&mut self, index: usize) {
        if index >= self.len() {
            return;
        }
        for (offset, &height) in self.heights[index..].iter().enumerate() {
            fenwick::array::update(&mut self.tree, index + offset, -(height as isize));
        }
        let removed: usize = self.heights[index..].iter().sum();
        self.heights.truncate(index);
        self.total -= removed;
    }

    /// Clears all rows, retaining capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
        self.total = 0;
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (idx, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }
}
