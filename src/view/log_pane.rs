//! Log list widget.
//!
//! Draws the engine's rendered rows at their estimated offsets. A row is
//! clipped to its estimated height even if wrapping produced more lines, so
//! the list never overlaps itself when an estimate runs short.

use crate::model::Row;
use crate::view::constants::{CALCULATING_TEXT, PLACEHOLDER_TEXT};
use crate::view::measure::wrap;
use crate::view::styles::LevelStyles;
use crate::view_state::RowSlot;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};

/// Log list widget.
pub struct LogPane<'a> {
    rows: &'a [(RowSlot, &'a Row)],
    scroll_offset: usize,
    hidden: bool,
    styles: &'a LevelStyles,
}

impl<'a> LogPane<'a> {
    /// Rows as returned by `Engine::rendered_rows`, drawn from `scroll_offset`.
    pub fn new(
        rows: &'a [(RowSlot, &'a Row)],
        scroll_offset: usize,
        styles: &'a LevelStyles,
    ) -> Self {
        Self {
            rows,
            scroll_offset,
            hidden: false,
            styles,
        }
    }

    /// Replace the list with the calculating notice.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl Widget for LogPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.hidden {
            Paragraph::new(Line::from(CALCULATING_TEXT))
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }

        let viewport_end = self.scroll_offset + area.height as usize;
        for (slot, row) in self.rows {
            let bottom = slot.top + slot.height;
            if bottom <= self.scroll_offset || slot.top >= viewport_end {
                continue;
            }

            let text = if row.is_placeholder() {
                PLACEHOLDER_TEXT
            } else {
                row.message()
            };
            let style = self.styles.style_for_row(row);
            let lines = wrap(text, area.width as usize);

            for (line_no, line) in lines.iter().enumerate().take(slot.height) {
                let absolute = slot.top + line_no;
                if absolute < self.scroll_offset || absolute >= viewport_end {
                    continue;
                }
                let y = area.y + (absolute - self.scroll_offset) as u16;
                buf.set_stringn(area.x, y, *line, area.width as usize, style);
            }
        }
    }
}
