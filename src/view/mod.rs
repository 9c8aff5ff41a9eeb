//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod footer;
pub mod layout;
mod log_pane;
pub mod measure;
mod stats;
mod styles;

pub use footer::{Footer, GotoInput, TailIndicator};
pub use log_pane::LogPane;
pub use measure::TerminalMeasurer;
pub use stats::StatsPanel;
pub use styles::{ColorConfig, LevelStyles};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::driver::{Driver, HostInput};
use crate::model::{KeyAction, LogStore};
use crate::source::SyntheticFetcher;
use crate::state::Engine;
use crate::view::constants::MOUSE_SCROLL_LINES;
use crate::view_state::Align;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Presentation state that lives outside the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Whether the stats panel is visible.
    pub show_stats: bool,
    /// Open goto prompt, if any.
    pub goto: Option<GotoInput>,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    driver: Driver,
    key_bindings: KeyBindings,
    styles: LevelStyles,
    ui: UiState,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen, and seeds the
    /// store with `initial_rows` synthetic rows.
    pub fn new(config: &ResolvedConfig, colors: ColorConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let size = terminal.size()?;
        let dimensions =
            layout::list_dimensions(Rect::new(0, 0, size.width, size.height), config.show_stats);
        let fetcher = SyntheticFetcher::new(config.response_time());
        let store = LogStore::from_rows(fetcher.generate(config.initial_rows));
        info!(
            rows = store.len(),
            width = dimensions.width,
            height = dimensions.height,
            "Starting log window"
        );

        let driver = Driver::new(
            config.engine(),
            config.driver(),
            dimensions,
            store,
            Arc::new(fetcher),
            Arc::new(TerminalMeasurer),
        );
        let ui = UiState {
            show_stats: config.show_stats,
            goto: None,
        };

        Ok(TuiApp::with_terminal(
            terminal,
            driver,
            KeyBindings::default(),
            LevelStyles::with_color_config(colors),
            ui,
        ))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Redraws after every terminal event and
    /// every engine event, and is otherwise idle.
    pub async fn run(&mut self) -> Result<(), TuiError> {
        let mut events = EventStream::new();
        self.driver.start();
        self.draw()?;

        loop {
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => {
                        if self.handle_event(event)? {
                            return Ok(());
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                },
                engine_event = self.driver.next_event() => self.driver.apply(engine_event),
            }
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Assemble an app over an existing terminal and driver.
    pub fn with_terminal(
        terminal: Terminal<B>,
        driver: Driver,
        key_bindings: KeyBindings,
        styles: LevelStyles,
        ui: UiState,
    ) -> Self {
        Self {
            terminal,
            driver,
            key_bindings,
            styles,
            ui,
        }
    }

    /// The driver behind this app.
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Presentation state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Handle a terminal event. Returns true if the app should quit.
    fn handle_event(&mut self, event: Event) -> Result<bool, TuiError> {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                self.send_list_dimensions(Rect::new(0, 0, width, height));
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool, TuiError> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        let action = self.key_bindings.get(key);

        // The goto prompt captures typing until submitted or cancelled
        if let Some(goto) = &mut self.ui.goto {
            match action {
                Some(KeyAction::SubmitGoto) => {
                    let target = goto.target();
                    self.ui.goto = None;
                    if let Some(index) = target {
                        self.driver.input(HostInput::ScrollToIndex {
                            index,
                            align: Align::Start,
                        });
                    }
                }
                Some(KeyAction::CancelGoto) => self.ui.goto = None,
                Some(KeyAction::Quit) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true);
                }
                _ => match key.code {
                    KeyCode::Char(ch) => goto.push(ch),
                    KeyCode::Backspace => goto.backspace(),
                    _ => {}
                },
            }
            return Ok(false);
        }

        let Some(action) = action else {
            return Ok(false);
        };
        let page = self.driver.engine().window_state().container_height.max(1) as isize;
        let line = self
            .driver
            .engine()
            .viewport()
            .current_metrics()
            .line_height
            .max(1) as isize;

        match action {
            KeyAction::Quit => return Ok(true),
            KeyAction::ScrollUp => self.scroll_by(-line),
            KeyAction::ScrollDown => self.scroll_by(line),
            KeyAction::PageUp => self.scroll_by(-page),
            KeyAction::PageDown => self.scroll_by(page),
            KeyAction::ScrollToTop => {
                if !list_hidden(self.driver.engine()) {
                    self.driver.input(HostInput::Scrolled(0));
                }
            }
            KeyAction::FollowLatest => self.driver.input(HostInput::FollowLatest),
            KeyAction::StartGoto => self.ui.goto = Some(GotoInput::new()),
            KeyAction::SubmitGoto | KeyAction::CancelGoto => {}
            KeyAction::ToggleStats => {
                self.ui.show_stats = !self.ui.show_stats;
                let size = self.terminal.size()?;
                self.send_list_dimensions(Rect::new(0, 0, size.width, size.height));
            }
        }
        Ok(false)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let lines = MOUSE_SCROLL_LINES as isize;
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-lines),
            MouseEventKind::ScrollDown => self.scroll_by(lines),
            _ => {}
        }
    }

    /// Scroll relative to the current offset. Ignored while the list is hidden.
    fn scroll_by(&mut self, delta: isize) {
        let engine = self.driver.engine();
        if list_hidden(engine) {
            return;
        }
        let offset = engine.window_state().scroll_offset.saturating_add_signed(delta);
        self.driver.input(HostInput::Scrolled(offset));
    }

    fn send_list_dimensions(&mut self, area: Rect) {
        let dimensions = layout::list_dimensions(area, self.ui.show_stats);
        self.driver.input(HostInput::Resized(dimensions));
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let engine = self.driver.engine();
        let ui = &self.ui;
        let styles = &self.styles;
        self.terminal
            .draw(|frame| render(frame, engine, ui, styles))?;
        Ok(())
    }
}

/// The list is hidden until a height cache exists and while one is rebuilt.
fn list_hidden(engine: &Engine) -> bool {
    engine.is_loading() || engine.viewport().is_calibrating()
}

fn render(frame: &mut Frame, engine: &Engine, ui: &UiState, styles: &LevelStyles) {
    let areas = layout::split(frame.area(), ui.show_stats);

    let mut header = vec![
        Span::styled(" logwindow ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} rows", engine.store().len())),
    ];
    if let Some(error) = engine.last_error() {
        header.push(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), areas.header);

    let rows = engine.rendered_rows();
    let pane = LogPane::new(&rows, engine.window_state().scroll_offset, styles)
        .hidden(list_hidden(engine));
    frame.render_widget(pane, areas.list);

    if let Some(area) = areas.stats {
        let stats = engine.stats();
        frame.render_widget(StatsPanel::new(&stats, engine.last_error()), area);
    }

    frame.render_widget(Footer::new(engine.flags(), ui.goto.as_ref()), areas.footer);
}

/// Initialize and run the TUI application
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub async fn run(config: &ResolvedConfig, colors: ColorConfig) -> Result<(), TuiError> {
    let mut app = TuiApp::new(config, colors)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run().await;

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
