//! Domain-level keyboard actions independent of key bindings.

/// Actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll up by one line. Default: k/↑
    ScrollUp,
    /// Scroll down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page height. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest loaded row. Default: g/Home
    ScrollToTop,
    /// Jump to the newest row and follow it. Default: G/End
    FollowLatest,

    // Goto input
    /// Open the scroll-to-index prompt. Default: :
    StartGoto,
    /// Submit the prompt. Default: Enter
    SubmitGoto,
    /// Close the prompt without jumping. Default: Esc
    CancelGoto,

    // Application
    /// Toggle visibility of the stats panel. Default: s
    ToggleStats,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether the action moves the viewport.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::FollowLatest
        )
    }
}
