//! Status Bar
//!
//! Displays:
//! - Memory register
//! - Collection mode or pending operation
//! - Last status message (export result, store fallback)

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Palette;
use crate::app::App;

const HELP: &str = "Tab keypad  h history  d theme  x export  c clear  q quit";

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border());
    if let Some(status) = app.status() {
        block = block.title_bottom(format!(" {} ", status));
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    f.render_widget(
        Paragraph::new(app.memory_text()).style(palette.muted()),
        halves[0],
    );
    f.render_widget(
        Paragraph::new(app.mode_text().unwrap_or_default())
            .alignment(Alignment::Right)
            .style(palette.muted()),
        halves[1],
    );
}

pub fn render_help_line(f: &mut Frame, area: Rect, palette: &Palette) {
    f.render_widget(
        Paragraph::new(HELP)
            .alignment(Alignment::Center)
            .style(palette.muted()),
        area,
    );
}
