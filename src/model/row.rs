//! Log rows and their identifiers.
//!
//! A [`Row`] is either a loaded log line or a placeholder reserving a slot
//! whose content has not arrived yet. Placeholders render at a fixed filler
//! height (see `view_state::height_estimator`).

use chrono::{DateTime, Utc};
use std::fmt;

/// Message text carried by every placeholder row.
pub const PLACEHOLDER_MESSAGE: &str = "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx";

/// Opaque identifier of a log row.
///
/// Empty ids are rejected by the smart constructor; placeholders carry no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowId(String);

/// Error returned when constructing a `RowId` from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Row id must not be empty")]
pub struct InvalidRowId;

impl RowId {
    /// Smart constructor: validates a non-empty id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRowId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidRowId)
        } else {
            Ok(Self(raw))
        }
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity attached to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Debug output.
    Debug,
    /// Informational output.
    Info,
    /// Warning output.
    Warn,
}

impl LogLevel {
    /// Lowercase label as shown in the log pane.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a log line came from (platform, dyno).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowContext {
    /// Emitting source, e.g. `app`.
    pub source: String,
    /// Dyno type, e.g. `web`.
    pub dyno_type: String,
    /// Dyno number.
    pub dyno_id: u8,
}

/// Timestamps and metadata carried by a loaded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMeta {
    /// Event time.
    pub dt: DateTime<Utc>,
    /// Time the line was ingested.
    pub inserted_at: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Emitting context.
    pub context: RowContext,
    /// Application version that emitted the line.
    pub version: u8,
}

/// One row of the log stream.
///
/// # Invariants
/// - Placeholder rows have no id and no metadata.
/// - Loaded rows always have an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: Option<RowId>,
    message: String,
    meta: Option<RowMeta>,
    is_placeholder: bool,
}

impl Row {
    /// Create a loaded row.
    pub fn new(id: RowId, message: impl Into<String>, meta: Option<RowMeta>) -> Self {
        Self {
            id: Some(id),
            message: message.into(),
            meta,
            is_placeholder: false,
        }
    }

    /// Create a placeholder reserving one slot.
    pub fn placeholder() -> Self {
        Self {
            id: None,
            message: PLACEHOLDER_MESSAGE.to_string(),
            meta: None,
            is_placeholder: true,
        }
    }

    /// `count` placeholders.
    pub fn placeholders(count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::placeholder()).collect()
    }

    /// Row id, `None` for placeholders.
    pub fn id(&self) -> Option<&RowId> {
        self.id.as_ref()
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message length in characters. This is the key used for height estimation.
    pub fn message_len(&self) -> usize {
        self.message.chars().count()
    }

    /// Timestamps and metadata, if loaded.
    pub fn meta(&self) -> Option<&RowMeta> {
        self.meta.as_ref()
    }

    /// Whether this row is an unresolved placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }
}
