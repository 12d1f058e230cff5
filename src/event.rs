//! Keyboard event handling.
//!
//! This module manages keyboard input with Vim-style navigation:
//! - `h`/`l`: previous/next alignment column (wraps across blocks)
//! - `j`/`k`: next/previous sequence (wraps across blocks)
//! - `0` or `Home`: first column of the block
//! - `$` or `End`: last column of the block
//! - `PageUp`/`PageDown`: previous/next block
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the application
//!   - `:<number>`: go to alignment column
//!   - `:w <number>`: lay out again with a new line width

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Go to the first column of the current block
    GotoBlockStart,
    /// Go to the last column of the current block
    GotoBlockEnd,
    PreviousBlock,
    NextBlock,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    /// Execute current command
    ExecuteCommand,
    /// Cancel command mode
    CancelCommand,
    /// Backspace in command mode
    CommandBackspace,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode) -> Action {
    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) => handle_command_mode(key),
    }
}

/// Handles key events in normal mode (Vim-style navigation).
fn handle_normal_mode(key: KeyEvent) -> Action {
    // Handle Ctrl+C for emergency quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('l') | KeyCode::Right => Action::MoveRight,
        KeyCode::Char('h') | KeyCode::Left => Action::MoveLeft,

        KeyCode::Char('0') | KeyCode::Home => Action::GotoBlockStart,
        KeyCode::Char('$') | KeyCode::End => Action::GotoBlockEnd,

        KeyCode::PageUp => Action::PreviousBlock,
        KeyCode::PageDown => Action::NextBlock,

        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

/// Handles key events in command mode.
fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
pub fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::None | Action::Resize(_, _) => {}
        Action::Quit => state.should_quit = true,
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::MoveLeft => state.move_left(),
        Action::MoveRight => state.move_right(),
        Action::GotoBlockStart => state.goto_block_start(),
        Action::GotoBlockEnd => state.goto_block_end(),
        Action::PreviousBlock => state.previous_block(),
        Action::NextBlock => state.next_block(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::CommandChar(c) => state.command_input(c),
        Action::ExecuteCommand => state.execute_command(),
        Action::CancelCommand => state.cancel_command(),
        Action::CommandBackspace => state.command_backspace(),
    }
}
