//! Keyboard bindings configuration.

use crate::model::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings next to the arrow and page keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        let bindings = HashMap::from([
            // Vim-style scrolling
            (plain(KeyCode::Char('k')), KeyAction::ScrollUp),
            (plain(KeyCode::Char('j')), KeyAction::ScrollDown),
            (plain(KeyCode::Char('g')), KeyAction::ScrollToTop),
            (
                KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
                KeyAction::FollowLatest,
            ),
            // Arrows and paging
            (plain(KeyCode::Up), KeyAction::ScrollUp),
            (plain(KeyCode::Down), KeyAction::ScrollDown),
            (plain(KeyCode::PageUp), KeyAction::PageUp),
            (plain(KeyCode::PageDown), KeyAction::PageDown),
            (ctrl('u'), KeyAction::PageUp),
            (ctrl('d'), KeyAction::PageDown),
            (plain(KeyCode::Home), KeyAction::ScrollToTop),
            (plain(KeyCode::End), KeyAction::FollowLatest),
            // Goto prompt
            (plain(KeyCode::Char(':')), KeyAction::StartGoto),
            (plain(KeyCode::Enter), KeyAction::SubmitGoto),
            (plain(KeyCode::Esc), KeyAction::CancelGoto),
            // Application
            (plain(KeyCode::Char('s')), KeyAction::ToggleStats),
            (plain(KeyCode::Char('q')), KeyAction::Quit),
            (ctrl('c'), KeyAction::Quit),
        ]);

        Self { bindings }
    }
}
