//! Footer bar: key hints, the TAIL indicator and the goto prompt.

use crate::state::FlightFlags;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Text content for the TAIL indicator.
const TAIL_INDICATOR_PREFIX: &str = "[TAIL] ";

/// Key hints shown when no prompt is open.
const KEY_HINTS: &str = "j/k scroll  g top  G follow  : goto  s stats  q quit";

// ===== GotoInput =====

/// Digits typed into the "scroll to index" prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GotoInput {
    digits: String,
}

impl GotoInput {
    /// Empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character; anything other than an ASCII digit is ignored.
    pub fn push(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.digits.push(ch);
        }
    }

    /// Remove the last digit.
    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    /// Current text.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Parsed target index, `None` when empty or too large.
    pub fn target(&self) -> Option<usize> {
        self.digits.parse().ok()
    }
}

// ===== TailIndicator =====

/// Green "[TAIL]" while following the newest rows, gray otherwise.
#[derive(Debug, Clone, Copy)]
pub struct TailIndicator {
    tailing: bool,
}

impl TailIndicator {
    /// Indicator for the given tailing state.
    pub fn new(tailing: bool) -> Self {
        Self { tailing }
    }

    /// Render the indicator as a ratatui Span.
    pub fn render(&self) -> Span<'static> {
        let color = if self.tailing { Color::Green } else { Color::Gray };
        Span::styled(TAIL_INDICATOR_PREFIX, Style::default().fg(color))
    }
}

// ===== Footer =====

/// Footer widget.
///
/// Shows the goto prompt when it is open; otherwise the TAIL indicator,
/// loading markers and key hints.
pub struct Footer<'a> {
    flags: FlightFlags,
    goto: Option<&'a GotoInput>,
}

impl<'a> Footer<'a> {
    /// Footer for the current flags and prompt.
    pub fn new(flags: FlightFlags, goto: Option<&'a GotoInput>) -> Self {
        Self { flags, goto }
    }

    fn line(&self) -> Line<'a> {
        if let Some(goto) = self.goto {
            return Line::from(vec![
                Span::styled("Go to row: ", Style::default().fg(Color::Cyan)),
                Span::raw(goto.as_str()),
                Span::styled(
                    " ",
                    Style::default()
                        .bg(Color::White)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
        }

        let mut spans = vec![TailIndicator::new(self.flags.is_tailing).render()];
        if self.flags.is_loading_older_rows {
            spans.push(Span::styled("loading older ", Style::default().fg(Color::Yellow)));
        }
        if self.flags.is_loading_newer_rows {
            spans.push(Span::styled("loading newer ", Style::default().fg(Color::Yellow)));
        }
        spans.push(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
        Line::from(spans)
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}
