//! Text measurement on a terminal cell grid.
//!
//! Widths are display columns (`unicode-width`), heights are terminal rows.
//! Wrapping breaks anywhere, matching how the log pane draws messages.

use crate::view_state::{MeasureError, TextMeasurer};
use async_trait::async_trait;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Split `text` into slices at most `width` columns wide.
///
/// A glyph wider than `width` gets a line to itself. Empty text yields one
/// empty line.
pub fn wrap(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (offset, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used > 0 && used + w > width {
            lines.push(&text[start..offset]);
            start = offset;
            used = 0;
        }
        used += w;
    }
    lines.push(&text[start..]);
    lines
}

/// Measures text as the terminal will draw it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMeasurer;

#[async_trait]
impl TextMeasurer for TerminalMeasurer {
    fn text_width(&self, text: &str, _font: &str) -> Result<f64, MeasureError> {
        Ok(text.width() as f64)
    }

    async fn rendered_height(
        &self,
        text: &str,
        container_width: usize,
    ) -> Result<usize, MeasureError> {
        if container_width == 0 {
            return Err(MeasureError("container has no width".to_string()));
        }
        Ok(wrap(text, container_width).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_at_width() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wrap_exact_multiple_has_no_trailing_empty_line() {
        assert_eq!(wrap("abcdef", 3), vec!["abc", "def"]);
    }

    #[test]
    fn wrap_empty_is_one_line() {
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn wrap_counts_wide_glyphs_as_two_columns() {
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
    }

    #[tokio::test]
    async fn calibration_samples_fill_whole_lines() {
        let measurer = TerminalMeasurer;
        let per_line = measurer.text_width("x", "13px monospace").unwrap() as usize;
        assert_eq!(per_line, 1);

        for k in 1..=5 {
            let text = "x".repeat(k * 40);
            assert_eq!(measurer.rendered_height(&text, 40).await, Ok(k));
        }
    }

    #[tokio::test]
    async fn zero_width_container_is_an_error() {
        assert!(TerminalMeasurer.rendered_height("x", 0).await.is_err());
    }
}
