//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod key_action;
pub mod log_store;
pub mod row;

// Re-export for convenience
pub use error::{AppError, CalibrationError, EngineError, FetchError};
pub use key_action::KeyAction;
pub use log_store::LogStore;
pub use row::{InvalidRowId, LogLevel, Row, RowContext, RowId, RowMeta, PLACEHOLDER_MESSAGE};
