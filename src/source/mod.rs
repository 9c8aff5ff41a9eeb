//! Row transport.
//!
//! The engine only needs an async `fetch(direction, count) -> rows`; any
//! latency is allowed and failures are not retried. This module defines
//! that seam and ships a synthetic generator used by the binary.

use crate::model::{FetchError, Row};
use async_trait::async_trait;
use std::fmt;

pub mod synthetic;

pub use synthetic::SyntheticFetcher;

/// Which edge of the store a fetch extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchDirection {
    /// Rows older than the current head, prepended.
    Older,
    /// Rows newer than the current tail, appended.
    Newer,
}

impl fmt::Display for FetchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchDirection::Older => f.write_str("older"),
            FetchDirection::Newer => f.write_str("newer"),
        }
    }
}

/// Caller-supplied source of log rows.
///
/// Rows are returned in chronological order regardless of direction.
#[async_trait]
pub trait RowFetcher: Send + Sync {
    /// Fetch up to `count` rows beyond the given edge.
    async fn fetch(&self, direction: FetchDirection, count: usize) -> Result<Vec<Row>, FetchError>;
}
