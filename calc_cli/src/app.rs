//! Application state for the terminal front end.
//!
//! Everything the engine does not own lives here: which keypad is shown, the
//! focus cursor, the history panel toggle, the last-pressed highlight and
//! the status message. Engine state is only ever changed through
//! [`Calculator::dispatch`].

use std::time::{Duration, Instant};

use calc_core::engine::{InputEvent, Mode};
use calc_core::number::format_number;
use calc_core::Calculator;
use crossterm::event::KeyEvent;
use tracing::{info, warn};

use crate::config::Settings;
use crate::export::export_history;
use crate::keymap::map_key;
use crate::keypad::{label_for, Cursor, FocusMove, KeypadKind};

/// Everything a key press or button can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Input(InputEvent),
    ToggleKeypad,
    ToggleHistory,
    ToggleTheme,
    ExportHistory,
    MoveFocus(FocusMove),
    PressFocused,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct Highlight {
    label: &'static str,
    at: Instant,
}

pub struct App {
    calc: Calculator,
    settings: Settings,
    keypad: KeypadKind,
    cursor: Cursor,
    show_history: bool,
    highlight: Option<Highlight>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(calc: Calculator, settings: Settings, status: Option<String>) -> Self {
        App {
            calc,
            keypad: settings.initial_keypad,
            settings,
            cursor: Cursor::default(),
            show_history: false,
            highlight: None,
            status,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = map_key(key) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::MoveFocus(step) => {
                self.cursor = self.cursor.moved(self.keypad.layout(), step);
            }
            Action::PressFocused => {
                if let Some(button) = self.cursor.button(self.keypad.layout()) {
                    self.mark_pressed(button.label);
                    self.perform(button.action);
                }
            }
            other => {
                if let Some(label) = label_for(self.keypad, other) {
                    self.mark_pressed(label);
                }
                self.perform(other);
            }
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Input(event) => {
                self.calc.dispatch(event);
                if event == InputEvent::ClearHistory {
                    self.status = Some("History cleared".to_string());
                }
            }
            Action::ToggleKeypad => {
                self.keypad = self.keypad.toggled();
                self.cursor = self.cursor.clamped(self.keypad.layout());
                self.calc.reset_mode();
                info!(keypad = ?self.keypad, "keypad switched");
            }
            Action::ToggleHistory => self.show_history = !self.show_history,
            Action::ToggleTheme => {
                let dark = self.calc.toggle_dark_mode();
                info!(dark, "theme switched");
            }
            Action::ExportHistory => self.export(),
            Action::Quit => self.should_quit = true,
            // Resolved in handle_action
            Action::MoveFocus(_) | Action::PressFocused => {}
        }
    }

    fn mark_pressed(&mut self, label: &'static str) {
        self.highlight = Some(Highlight {
            label,
            at: Instant::now(),
        });
    }

    fn export(&mut self) {
        let path = self.settings.export_path();
        self.status = Some(match export_history(self.calc.history(), &path) {
            Ok(()) => format!(
                "Exported {} entries to {}",
                self.calc.history().len(),
                path.display()
            ),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "history export failed");
                format!("Export failed: {:#}", e)
            }
        });
    }

    /// Label to draw highlighted at `now`, if its time has not run out.
    pub fn highlighted(&self, now: Instant) -> Option<&'static str> {
        let duration = Duration::from_millis(self.settings.highlight_ms);
        self.highlight
            .filter(|h| now.saturating_duration_since(h.at) < duration)
            .map(|h| h.label)
    }

    /// `Calculator`/`Advanced` plus the collection suffix
    pub fn title(&self) -> String {
        let suffix = match self.calc.mode() {
            Mode::Normal => "",
            Mode::CollectingIntegrationBound => " (Integration)",
            Mode::CollectingDerivativePoint => " (Derivative)",
        };
        format!("{}{}", self.keypad.title(), suffix)
    }

    /// Right side of the status row
    pub fn mode_text(&self) -> Option<String> {
        match self.calc.mode() {
            Mode::CollectingIntegrationBound => Some("Integration Mode".to_string()),
            Mode::CollectingDerivativePoint => Some("Derivative Mode".to_string()),
            Mode::Normal => self
                .calc
                .pending_operator()
                .map(|op| format!("Operation: {}", op.symbol())),
        }
    }

    pub fn memory_text(&self) -> String {
        format!("Memory: {}", format_number(self.calc.memory()))
    }

    pub fn calc(&self) -> &Calculator {
        &self.calc
    }

    pub fn keypad(&self) -> KeypadKind {
        self.keypad
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::operations::BinaryOperator;
    use calc_core::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::env::temp_dir;
    use std::fs;

    fn app() -> App {
        app_with(Settings::default())
    }

    fn app_with(settings: Settings) -> App {
        App::new(Calculator::new(Box::new(MemoryStore::new())), settings, None)
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_keyboard_calculation() {
        let mut app = app();
        type_keys(&mut app, "12+30=");
        assert_eq!(app.calc().display(), "42");
        assert_eq!(app.calc().history().entries(), ["12 + 30 = 42"]);
    }

    #[test]
    fn test_focus_and_press() {
        let mut app = app();
        // Row 4 of the basic keypad starts with 7
        for _ in 0..4 {
            app.handle_action(Action::MoveFocus(FocusMove::Down));
        }
        app.handle_action(Action::PressFocused);
        app.handle_action(Action::PressFocused);
        assert_eq!(app.calc().display(), "77");
        assert_eq!(app.highlighted(Instant::now()), Some("7"));
    }

    #[test]
    fn test_highlight_expires() {
        let mut app = app();
        type_keys(&mut app, "5");
        let now = Instant::now();
        assert_eq!(app.highlighted(now), Some("5"));
        assert_eq!(app.highlighted(now + Duration::from_millis(250)), None);
    }

    #[test]
    fn test_highlight_does_not_touch_engine() {
        let mut app = app();
        type_keys(&mut app, "9");
        let before = app.calc().state().clone();
        let _ = app.highlighted(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.calc().state(), &before);
    }

    #[test]
    fn test_keypad_toggle_resets_mode() {
        let mut app = app();
        app.handle_action(Action::ToggleKeypad);
        assert_eq!(app.keypad(), KeypadKind::Advanced);
        assert_eq!(app.title(), "Advanced");

        type_keys(&mut app, "2");
        app.handle_action(Action::Input(InputEvent::Integral));
        assert_eq!(app.title(), "Advanced (Integration)");
        assert_eq!(app.mode_text().as_deref(), Some("Integration Mode"));

        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.keypad(), KeypadKind::Basic);
        assert_eq!(app.calc().mode(), Mode::Normal);
        assert_eq!(app.title(), "Calculator");
    }

    #[test]
    fn test_status_row_texts() {
        let mut app = app();
        assert_eq!(app.memory_text(), "Memory: 0");
        assert_eq!(app.mode_text(), None);

        type_keys(&mut app, "8*");
        assert_eq!(
            app.calc().pending_operator(),
            Some(BinaryOperator::Mul)
        );
        assert_eq!(app.mode_text().as_deref(), Some("Operation: *"));
    }

    #[test]
    fn test_toggle_history_and_quit() {
        let mut app = app();
        type_keys(&mut app, "h");
        assert!(app.show_history());
        type_keys(&mut app, "q");
        assert!(app.should_quit());
    }

    #[test]
    fn test_export_reports_in_status() {
        let dir = temp_dir().join(format!("calci_app_export_{}", std::process::id()));
        let settings = Settings {
            export_dir: dir.clone(),
            ..Settings::default()
        };
        let mut app = app_with(settings);
        type_keys(&mut app, "1+1=x");

        assert!(app.status().unwrap().starts_with("Exported 1 entries"));
        let written = fs::read_to_string(dir.join("calculator_history.txt")).unwrap();
        assert_eq!(written, "1 + 1 = 2");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_failed_export_leaves_engine_alone() {
        let blocker = temp_dir().join(format!("calci_app_blocker_{}", std::process::id()));
        fs::write(&blocker, "file").unwrap();
        let settings = Settings {
            export_dir: blocker.clone(),
            ..Settings::default()
        };
        let mut app = app_with(settings);
        type_keys(&mut app, "3+4=");
        let before = app.calc().state().clone();

        app.handle_action(Action::ExportHistory);
        assert!(app.status().unwrap().starts_with("Export failed"));
        assert_eq!(app.calc().state(), &before);
        let _ = fs::remove_file(blocker);
    }

    #[test]
    fn test_theme_toggle() {
        let mut app = app();
        assert!(!app.calc().dark_mode());
        type_keys(&mut app, "d");
        assert!(app.calc().dark_mode());
    }
}
