//! Row styling configuration.
//!
//! Distinct colors per log level, with placeholders dimmed.

use crate::model::{LogLevel, Row};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Colors are disabled by the `--no-color` flag or the `NO_COLOR`
/// environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LevelStyles =====

/// Styles for log rows by level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyles {
    debug: Style,
    info: Style,
    warn: Style,
    placeholder: Style,
}

impl LevelStyles {
    /// Styles for the given color configuration.
    ///
    /// With colors disabled only the placeholder keeps a modifier.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let placeholder = Style::default().add_modifier(Modifier::DIM);
        if config.colors_enabled() {
            Self {
                debug: Style::default().fg(Color::DarkGray),
                info: Style::default(),
                warn: Style::default().fg(Color::Yellow),
                placeholder: placeholder.fg(Color::DarkGray),
            }
        } else {
            Self {
                debug: Style::default(),
                info: Style::default(),
                warn: Style::default(),
                placeholder,
            }
        }
    }

    /// Style for a log level.
    pub fn style_for_level(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
        }
    }

    /// Style for a row; rows without metadata use the info style.
    pub fn style_for_row(&self, row: &Row) -> Style {
        if row.is_placeholder() {
            return self.placeholder;
        }
        row.meta()
            .map(|meta| self.style_for_level(meta.level))
            .unwrap_or(self.info)
    }
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn color_config_respects_no_color_flag() {
        assert!(!ColorConfig::from_env_and_args(true).colors_enabled());
    }

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled());
    }

    #[test]
    fn warn_rows_are_yellow_when_colored() {
        let styles = LevelStyles::with_color_config(ColorConfig { enabled: true });
        assert_eq!(styles.style_for_level(LogLevel::Warn).fg, Some(Color::Yellow));
    }

    #[test]
    fn placeholder_is_dimmed_without_colors() {
        let styles = LevelStyles::with_color_config(ColorConfig { enabled: false });
        let style = styles.style_for_row(&Row::placeholder());
        assert!(style.add_modifier.contains(Modifier::DIM));
        assert_eq!(styles.style_for_level(LogLevel::Warn), Style::default());
    }
}
