//! Keyboard event handling for the interactive front end.
//!
//! - `Tab`, `Shift+Tab`, `Up`, `Down`: move focus between the two fields
//! - any printable key: type into the focused field
//! - `Backspace`: delete the last character
//! - `Enter`: run the selected tool
//! - `F2`: switch between "Retrieve AMR Sequences" and "Table to FASTA"
//! - `Esc` or `Ctrl+C`: quit

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::model::{AppState, Job};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Move focus to the other field
    ToggleFocus,
    /// Add a character to the focused field
    Input(char),
    /// Delete the last character of the focused field
    Backspace,
    /// Run the selected tool
    Run,
    /// Switch tool
    SwitchTool,
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

/// Converts a crossterm event to an Action.
pub fn handle_event(event: Event) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event),
        // Resizes need no action: the next draw picks up the new size.
        _ => Action::None,
    }
}

fn handle_key_event(key: KeyEvent) -> Action {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Action::ToggleFocus,
        KeyCode::Enter => Action::Run,
        KeyCode::F(2) => Action::SwitchTool,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::Input(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns the job to start when the action launched a run.
pub fn apply_action(state: &mut AppState, action: Action) -> Option<Job> {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleFocus => {
            state.toggle_focus();
        }
        Action::Input(c) => {
            state.input_char(c);
        }
        Action::Backspace => {
            state.backspace();
        }
        Action::Run => {
            return state.start_job();
        }
        Action::SwitchTool => {
            state.switch_tool();
        }
    }
    None
}
