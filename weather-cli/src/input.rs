//! Key events -> screen actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use weather_core::screen::{Action, ScreenState};

/// The search field always has focus, so printable keys edit it and commands
/// live on Enter, function keys and Ctrl chords.
pub fn map_key(key: KeyEvent, state: &ScreenState) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('r') if ctrl => Some(Action::Refresh),
        KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Enter => Some(Action::SearchSubmit),
        KeyCode::Backspace => {
            let mut text = state.search.clone();
            text.pop()?;
            Some(Action::SearchChange(text))
        }
        KeyCode::Char('u') if ctrl => {
            if state.search.is_empty() {
                None
            } else {
                Some(Action::SearchChange(String::new()))
            }
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            let mut text = state.search.clone();
            text.push(c);
            Some(Action::SearchChange(text))
        }
        _ => None,
    }
}
