//! Keyboard event handling for TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Move cursor up one item.
    MoveUp,
    /// Move cursor down one item.
    MoveDown,
    /// Switch to the highlighted organization.
    Select,
    /// Quit without action.
    Quit,
    /// No action.
    None,
}

/// Handle a crossterm event and return the corresponding action.
pub fn handle_event(event: Event) -> AppAction {
    match event {
        Event::Key(key_event) => handle_key(key_event),
        _ => AppAction::None,
    }
}

fn handle_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return AppAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => AppAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => AppAction::MoveDown,
        KeyCode::Enter => AppAction::Select,
        KeyCode::Char('q') | KeyCode::Esc => AppAction::Quit,
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(handle_event(key(KeyCode::Char('j'))), AppAction::MoveDown);
        assert_eq!(handle_event(key(KeyCode::Up)), AppAction::MoveUp);
        assert_eq!(handle_event(key(KeyCode::Enter)), AppAction::Select);
        assert_eq!(handle_event(key(KeyCode::Esc)), AppAction::Quit);
        assert_eq!(handle_event(key(KeyCode::Char('x'))), AppAction::None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_event(event), AppAction::Quit);
    }
}
