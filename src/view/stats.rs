//! Statistics panel widget for engine diagnostics.

use crate::model::EngineError;
use crate::state::EngineStats;
use crate::view_state::CalibrationStatus;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

// ===== StatsPanel Widget =====

/// Statistics panel widget.
///
/// Displays:
/// - Row count and estimated list height
/// - Container metrics from the active height cache
/// - Calibration and in-flight fetch flags
/// - The most recent engine error, if any
pub struct StatsPanel<'a> {
    stats: &'a EngineStats,
    last_error: Option<&'a EngineError>,
}

impl<'a> StatsPanel<'a> {
    /// Create a new StatsPanel widget.
    pub fn new(stats: &'a EngineStats, last_error: Option<&'a EngineError>) -> Self {
        Self { stats, last_error }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let stats = self.stats;
        let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let caching = matches!(
            stats.calibration,
            CalibrationStatus::Uncalibrated | CalibrationStatus::Calibrating
        );

        let mut lines = vec![
            Line::from("List:").style(heading),
            Line::from(format!("  rows: {}", format_count(stats.row_count))),
            Line::from(format!("  height: {}", format_count(stats.total_height))),
            Line::from(format!("  offset: {}", format_count(stats.scroll_offset))),
            Line::from(""),
            Line::from("Metrics:").style(heading),
            Line::from(format!("  width: {}", stats.metrics.width)),
            Line::from(format!("  char: {:.2}", stats.metrics.char_width)),
            Line::from(format!("  chars/line: {}", stats.metrics.chars_per_line)),
            Line::from(format!("  line: {}", stats.metrics.line_height)),
            Line::from(""),
            Line::from("Flags:").style(heading),
            Line::from(format!("  caching: {}", caching)),
            Line::from(format!("  loading older: {}", stats.flags.is_loading_older_rows)),
            Line::from(format!("  loading newer: {}", stats.flags.is_loading_newer_rows)),
            Line::from(format!("  tailing: {}", stats.flags.is_tailing)),
        ];

        if let Some(error) = self.last_error {
            lines.push(Line::from(""));
            lines.push(Line::from("Last error:").style(heading));
            lines.push(Line::from(format!("  {}", error)).style(Style::default().fg(Color::Red)));
        }
        lines
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::White));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

// ===== Formatting Helpers =====

/// Format a count with thousands separators.
///
/// Examples:
/// - `format_count(0)` → "0"
/// - `format_count(1234567)` → "1,234,567"
fn format_count(count: usize) -> String {
    let s = count.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

// ===== Tests =====
