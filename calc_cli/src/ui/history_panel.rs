//! History Panel
//!
//! Oldest entry first. When the log outgrows the panel the newest entries
//! stay visible.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Palette;
use crate::app::App;

pub fn render_history(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(" History ")
        .title_bottom(" [x] Export  [c] Clear ");

    let entries = app.calc().history().entries();
    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::styled("No history yet", palette.muted())]
    } else {
        let visible = usize::from(area.height.saturating_sub(2));
        entries
            .iter()
            .skip(entries.len().saturating_sub(visible))
            .map(|entry| Line::styled(entry.as_str(), palette.base()))
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
