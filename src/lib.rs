//! Virtualized, bidirectionally paginated log list with live tailing.
//!
//! Rows have variable wrapped heights. Heights are predicted from a
//! calibrated estimator, only the visible window is materialized, older rows
//! are prepended without moving the view, and newer rows are appended by a
//! tail poll while the view rests on the newest row.
//!
//! The core (`view_state`, `state`) is pure and synchronous; the `driver`
//! runs its commands on tokio and `view` renders it in a terminal.

pub mod config;
pub mod driver;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_harness;
