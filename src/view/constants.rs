//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for layout-related numeric values.

/// Height of the header bar in lines.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the footer (key hints or goto prompt) in lines.
pub const FOOTER_HEIGHT: u16 = 1;

/// Width of the stats panel in columns, borders included.
///
/// The panel sits to the right of the log list, so toggling it changes the
/// list width and triggers recalibration.
pub const STATS_PANEL_WIDTH: u16 = 26;

/// Lines moved per mouse wheel notch.
pub const MOUSE_SCROLL_LINES: usize = 3;

/// Text shown in the list area while no height cache is usable.
pub const CALCULATING_TEXT: &str = "Calculating...";

/// Text rendered for a placeholder row.
pub const PLACEHOLDER_TEXT: &str = "Placeholder";
