//! Main application state and TUI event loop for the viewing dashboard.
//!
//! [`App`] owns the theme, the [`DashboardSession`] and the snapshot last
//! computed from it. Every key that changes the session recomputes the
//! snapshot; drawing only reads it.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{debug, warn};

use dashboard_runtime::{DashboardSession, DashboardSnapshot};

use crate::dashboard_view;
use crate::themes::Theme;

// ── KeyAction ─────────────────────────────────────────────────────────────────

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleContentType,
    /// Zero-based index into the sorted profile list.
    ToggleProfile(usize),
    SelectAllProfiles,
    NextHeatmapProfile,
    PreviousHeatmapProfile,
    Reload,
    Ignore,
}

/// Map a key event to its action.
pub fn key_action(key: &KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::ToggleContentType,
        KeyCode::Char(c @ '1'..='9') => KeyAction::ToggleProfile(c as usize - '1' as usize),
        KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::SelectAllProfiles,
        KeyCode::Char('p') | KeyCode::Tab => KeyAction::NextHeatmapProfile,
        KeyCode::Char('P') | KeyCode::BackTab => KeyAction::PreviousHeatmapProfile,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Reload,
        _ => KeyAction::Ignore,
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub session: DashboardSession,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    snapshot: DashboardSnapshot,
}

impl App {
    pub fn new(theme_name: &str, session: DashboardSession) -> Self {
        let snapshot = session.snapshot();
        Self {
            theme: Theme::from_name(theme_name),
            session,
            should_quit: false,
            snapshot,
        }
    }

    /// The snapshot the next frame will draw.
    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// Apply one key press. Returns `true` when the view changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let action = key_action(key);
        debug!("Key {:?} -> {:?}", key.code, action);
        match action {
            KeyAction::Quit => {
                self.should_quit = true;
                return false;
            }
            KeyAction::Ignore => return false,
            KeyAction::ToggleContentType => self.session.toggle_content_type(),
            KeyAction::ToggleProfile(index) => {
                if !self.session.toggle_profile(index) {
                    return false;
                }
            }
            KeyAction::SelectAllProfiles => self.session.select_all_profiles(),
            KeyAction::NextHeatmapProfile => self.session.cycle_heatmap_profile(true),
            KeyAction::PreviousHeatmapProfile => self.session.cycle_heatmap_profile(false),
            KeyAction::Reload => {
                // The session keeps the previous dataset and records the
                // error for the status line.
                if let Err(e) = self.session.reload() {
                    warn!("Reload failed: {}", e);
                }
            }
        }
        self.snapshot = self.session.snapshot();
        true
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so resizes are
    /// picked up without a key press.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(&key);
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Render the current snapshot into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, &self.snapshot, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
