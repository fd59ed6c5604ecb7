//! UI module for the Calci terminal front end
//!
//! # Panel Structure
//! - `header` - Keypad title and collection mode
//! - `display` - Pending expression above the display text
//! - `history_panel` - History entries (toggled)
//! - `status_bar` - Memory, mode/operation and status message
//! - `keypad` - Button grid with focus and last-pressed highlight
//!
//! `theme` holds the light and dark palettes.

pub mod display;
pub mod header;
pub mod history_panel;
pub mod keypad;
pub mod status_bar;
pub mod theme;

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::App;
use theme::Palette;

/// Height of the history panel when shown
const HISTORY_HEIGHT: u16 = 10;

/// Draw the whole screen.
pub fn draw(f: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.calc().dark_mode());
    f.render_widget(Block::default().style(palette.base()), f.area());

    let history_height = if app.show_history() { HISTORY_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(history_height),
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render_header(f, chunks[0], app, &palette);
    display::render_display(f, chunks[1], app, &palette);
    if app.show_history() {
        history_panel::render_history(f, chunks[2], app, &palette);
    }
    status_bar::render_status_bar(f, chunks[3], app, &palette);
    keypad::render_keypad(f, chunks[4], app, &palette, Instant::now());
    status_bar::render_help_line(f, chunks[5], &palette);
}
