//! Keyboard to action mapping.

use calc_core::engine::InputEvent;
use calc_core::operations::BinaryOperator;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Action;
use crate::keypad::FocusMove;

/// Translate a key press; `None` for keys with no binding.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char(c @ '0'..='9') => Action::Input(InputEvent::Digit(c as u8 - b'0')),
        KeyCode::Char('.') => Action::Input(InputEvent::Dot),
        KeyCode::Char('+') => Action::Input(InputEvent::Operator(BinaryOperator::Add)),
        KeyCode::Char('-') => Action::Input(InputEvent::Operator(BinaryOperator::Sub)),
        KeyCode::Char('*') => Action::Input(InputEvent::Operator(BinaryOperator::Mul)),
        KeyCode::Char('/') => Action::Input(InputEvent::Operator(BinaryOperator::Div)),
        KeyCode::Enter | KeyCode::Char('=') => Action::Input(InputEvent::Equals),
        KeyCode::Esc => Action::Input(InputEvent::ClearAll),
        KeyCode::Backspace => Action::Input(InputEvent::ClearLastChar),
        KeyCode::Tab => Action::ToggleKeypad,

        KeyCode::Char('h') => Action::ToggleHistory,
        KeyCode::Char('d') => Action::ToggleTheme,
        KeyCode::Char('x') => Action::ExportHistory,
        KeyCode::Char('c') => Action::Input(InputEvent::ClearHistory),
        KeyCode::Char('q') => Action::Quit,

        KeyCode::Up => Action::MoveFocus(FocusMove::Up),
        KeyCode::Down => Action::MoveFocus(FocusMove::Down),
        KeyCode::Left => Action::MoveFocus(FocusMove::Left),
        KeyCode::Right => Action::MoveFocus(FocusMove::Right),
        KeyCode::Char(' ') => Action::PressFocused,
        _ => return None,
    };
    Some(action)
}
