//! Keyboard and mouse input handling for the dashboard.
//!
//! Key presses are mapped to [`Action`]s, which are then applied to the
//! [`App`] and may produce a [`Command`] for the worker.
//!
//! # Key Bindings
//!
//! | Key                   | Action                 |
//! |-----------------------|------------------------|
//! | `q`                   | Quit                   |
//! | `r`                   | Refresh every LED      |
//! | `↓` / `j`             | Select next LED        |
//! | `↑` / `k`             | Select previous LED    |
//! | `Enter` / `Space` / `t` | Toggle selected LED  |
//! | `h`                   | History of selected LED |
//! | `b`                   | On-hours bar chart     |
//! | `l`                   | State timeline chart   |
//! | `d`                   | Session duration chart |
//! | `?`                   | Toggle help            |
//! | `Esc`                 | Close popup            |
//!
//! While a popup is open only `Esc`, `Enter`, `Space` (close) and `q` work.

use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};

use ledpanel_types::ChartKind;

use super::app::App;
use super::messages::Command;

/// User actions that can be triggered by input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Refresh every LED.
    Refresh,
    /// Select the next LED.
    SelectNext,
    /// Select the previous LED.
    SelectPrevious,
    /// Flip the selected LED.
    Toggle,
    /// Show the selected LED's history.
    ShowHistory,
    /// Load a chart.
    ShowChart(ChartKind),
    /// Toggle the help overlay.
    ToggleHelp,
    /// Close the topmost popup.
    Dismiss,
    /// No action.
    None,
}

/// Map a key to an action.
pub fn handle_key(key: KeyCode, has_popup: bool) -> Action {
    if has_popup {
        return match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Action::Dismiss,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t') => Action::Toggle,
        KeyCode::Char('h') => Action::ShowHistory,
        KeyCode::Char('b') => Action::ShowChart(ChartKind::OnTimeTotals),
        KeyCode::Char('l') => Action::ShowChart(ChartKind::StateTimeline),
        KeyCode::Char('d') => Action::ShowChart(ChartKind::SessionDurations),
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Dismiss,
        _ => Action::None,
    }
}

/// Map a mouse event to an action. The wheel moves the selection.
pub fn handle_mouse(event: MouseEvent) -> Action {
    match event.kind {
        MouseEventKind::ScrollDown => Action::SelectNext,
        MouseEventKind::ScrollUp => Action::SelectPrevious,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns the command to send to the worker, if the action needs one.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.quit();
            None
        }
        Action::Refresh => Some(app.refresh_command()),
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::Toggle => app.toggle_command(),
        Action::ShowHistory => app.history_command(),
        Action::ShowChart(kind) => app.chart_command(kind),
        Action::ToggleHelp => {
            app.toggle_help();
            None
        }
        Action::Dismiss => {
            app.dismiss();
            None
        }
        Action::None => None,
    }
}
