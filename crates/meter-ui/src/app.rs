//! Main application state and TUI event loop for Claude Meter.
//!
//! [`App`] owns the theme and the display language. It reads the latest
//! [`UsageStats`] from the orchestrator's `watch` channel on every frame, so
//! countdowns keep moving between samples.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::watch;

use meter_core::i18n::Language;
use meter_core::settings::Preferences;
use meter_runtime::orchestrator::MeterHandle;
use meter_runtime::stats_store::UsageStats;

use crate::components::status_line::status_line;
use crate::panel::{render_panel, PANEL_WIDTH};
use crate::themes::Theme;

/// Redraw cadence.
pub const TICK_RATE: Duration = Duration::from_millis(250);

// ── KeyAction ─────────────────────────────────────────────────────────────────

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Refresh,
    LanguageChanged,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the Claude Meter TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Current display language.
    pub language: Language,
    /// Where language changes are persisted; `None` keeps them in memory.
    pub prefs_path: Option<PathBuf>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, language: Language, prefs_path: Option<PathBuf>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            language,
            prefs_path,
            should_quit: false,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the meter TUI until the user quits or the orchestrator stops.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// the terminal event loop stays on the current thread while stats
    /// arrive on the `watch` channel.
    ///
    /// The loop exits on `q`, `Q`, or `Ctrl+C`.
    pub async fn run(
        mut self,
        mut rx: watch::Receiver<UsageStats>,
        meter: &MeterHandle,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = loop {
            let stats = rx.borrow_and_update().clone();
            if let Err(e) = terminal.draw(|frame| self.render(frame, &stats, Local::now())) {
                break Err(e);
            }

            match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match self.handle_key(key) {
                        KeyAction::Refresh => meter.refresh(),
                        KeyAction::Quit => self.should_quit = true,
                        KeyAction::LanguageChanged | KeyAction::None => {}
                    },
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // The sender lives in the sampling loop; an error means it stopped.
            if rx.has_changed().is_err() {
                tracing::warn!("sampling loop stopped; leaving the UI");
                self.should_quit = true;
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

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Map a key press to an action, applying language changes in place.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Refresh,
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.toggle_language();
                KeyAction::LanguageChanged
            }
            _ => KeyAction::None,
        }
    }

    /// Switch language and persist the choice.
    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
        tracing::info!("display language set to {}", self.language.code());

        if let Some(path) = &self.prefs_path {
            let prefs = Preferences {
                language: self.language,
            };
            if let Err(e) = prefs.save_to(path) {
                tracing::warn!(error = %e, "failed to persist language preference");
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Status line on the first row, the panel below it.
    pub fn render(&self, frame: &mut Frame, stats: &UsageStats, now: DateTime<Local>) {
        let area = frame.area();
        let [status_area, panel_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        frame.render_widget(
            Paragraph::new(status_line(stats, self.language, now, &self.theme)),
            status_area,
        );

        let panel_area = Rect {
            width: panel_area.width.min(PANEL_WIDTH),
            ..panel_area
        };
        render_panel(frame, panel_area, stats, self.language, now, &self.theme);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
