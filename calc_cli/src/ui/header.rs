//! Header (Top)
//!
//! Keypad title, with ` (Integration)` / ` (Derivative)` while a calculus
//! key is collecting its second value.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Palette;
use crate::app::App;

pub fn render_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let theme = if app.calc().dark_mode() { "dark" } else { "light" };
    let header = Paragraph::new(app.title())
        .alignment(Alignment::Center)
        .style(palette.base().add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border())
                .title(format!(" {} ", theme))
                .title_alignment(Alignment::Right),
        );
    f.render_widget(header, area);
}
