//! Screen layout.
//!
//! Header on top, footer at the bottom, the log list in between with the
//! optional stats panel on its right.

use crate::view::constants::{FOOTER_HEIGHT, HEADER_HEIGHT, STATS_PANEL_WIDTH};
use crate::view_state::ViewportDimensions;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Title bar.
    pub header: Rect,
    /// Log list.
    pub list: Rect,
    /// Stats panel, when shown.
    pub stats: Option<Rect>,
    /// Key hints or goto prompt.
    pub footer: Rect,
}

/// Split `area` into the screen regions.
pub fn split(area: Rect, show_stats: bool) -> ScreenAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    let (list, stats) = if show_stats {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(STATS_PANEL_WIDTH)])
            .split(vertical[1]);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (vertical[1], None)
    };

    ScreenAreas {
        header: vertical[0],
        list,
        stats,
        footer: vertical[2],
    }
}

/// Container dimensions the engine should see for a terminal of `area`.
pub fn list_dimensions(area: Rect, show_stats: bool) -> ViewportDimensions {
    let list = split(area, show_stats).list;
    ViewportDimensions::new(list.width as usize, list.height as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_fills_everything_between_header_and_footer() {
        let areas = split(Rect::new(0, 0, 80, 24), false);

        assert_eq!(areas.header, Rect::new(0, 0, 80, 1));
        assert_eq!(areas.list, Rect::new(0, 1, 80, 22));
        assert_eq!(areas.footer, Rect::new(0, 23, 80, 1));
        assert_eq!(areas.stats, None);
    }

    #[test]
    fn stats_panel_narrows_the_list() {
        let areas = split(Rect::new(0, 0, 80, 24), true);

        assert_eq!(areas.list.width, 80 - STATS_PANEL_WIDTH);
        assert_eq!(areas.stats, Some(Rect::new(80 - STATS_PANEL_WIDTH, 1, STATS_PANEL_WIDTH, 22)));
    }

    #[test]
    fn list_dimensions_follow_stats_toggle() {
        let area = Rect::new(0, 0, 100, 30);

        assert_eq!(list_dimensions(area, false), ViewportDimensions::new(100, 28));
        assert_eq!(list_dimensions(area, true), ViewportDimensions::new(74, 28));
    }
}
