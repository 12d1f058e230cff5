//! Application controller.
//!
//! This module orchestrates the interactive viewer:
//! - Terminal initialization and cleanup
//! - Background loading of the input with a loading screen
//! - Event polling and handling
//! - State updates and rendering

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::acquire;
use crate::event::{apply_action, handle_event, poll_event};
use crate::layout::LineWidth;
use crate::model::AppState;
use crate::session::{AlignmentSession, SessionOutcome};
use crate::ui::{calculate_visible_lines, info_panel_height, render, render_loading};

/// Event poll timeout.
const TICK_RATE: Duration = Duration::from_millis(50);

/// Raw-mode alternate-screen terminal, restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// The main application controller.
pub struct App {
    tui: Tui,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        Ok(Self {
            tui: Tui::new()?,
            state,
            tick_rate: TICK_RATE,
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            // The info panel grows with the selected header
            self.update_viewport_size()?;
            self.tui.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, &self.state.mode);
                apply_action(&mut self.state, action);

                if self.state.should_quit {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Updates the viewport size based on terminal dimensions.
    fn update_viewport_size(&mut self) -> Result<()> {
        let size = self.tui.terminal.size()?;
        let info_height = info_panel_height(&self.state, size.width);
        self.state
            .update_viewport_size(calculate_visible_lines(size.height, info_height));
        Ok(())
    }
}

/// Convenience function to run the viewer on an open session.
pub fn run_app(state: AppState) -> Result<()> {
    let mut app = App::new(state)?;
    app.run()
}

/// Returns true for keys that abort loading.
fn is_abort(event: &Event) -> bool {
    match event {
        Event::Key(key) => {
            matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
                || (key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c'))
        }
        _ => false,
    }
}

/// Reads `path` in the background behind a loading screen, then runs the
/// viewer on it.
pub fn run_app_with_loading(path: PathBuf, width: LineWidth) -> Result<()> {
    let source_name = path.display().to_string();
    let mut tui = Tui::new()?;

    let pending = acquire::spawn(path);
    let mut ticks = 0;
    let text = loop {
        if let Some(result) = pending.try_take() {
            break result?;
        }
        tui.terminal
            .draw(|frame| render_loading(frame, &source_name, ticks))?;
        if poll_event(TICK_RATE).is_some_and(|event| is_abort(&event)) {
            info!("Loading of {} cancelled", source_name);
            return Ok(());
        }
        ticks += 1;
    };

    let session = match AlignmentSession::open_with(&text, width)? {
        SessionOutcome::Ready(session) => session,
        SessionOutcome::NoSequences => bail!("No sequences found in {}", source_name),
    };
    drop(text);

    let mut app = App {
        tui,
        state: AppState::new(session, source_name),
        tick_rate: TICK_RATE,
    };
    app.run()
}
