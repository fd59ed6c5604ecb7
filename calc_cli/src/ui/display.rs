//! Display: pending expression line above the right-aligned display text.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Palette;
use crate::app::App;

pub fn render_display(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let pending = app.calc().pending_expression().unwrap_or_default();
    let lines = vec![
        Line::styled(pending, palette.muted()),
        Line::styled(
            app.calc().display().to_string(),
            palette.base().add_modifier(Modifier::BOLD),
        ),
    ];

    let display = Paragraph::new(lines).alignment(Alignment::Right).block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(palette.border()),
    );
    f.render_widget(display, area);
}
