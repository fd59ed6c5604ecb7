//! Keypad grid.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Palette;
use crate::app::App;
use crate::keypad::{Button, Cursor, COLUMNS};

pub fn render_keypad(f: &mut Frame, area: Rect, app: &App, palette: &Palette, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = app.keypad().layout();
    let row_count = layout.len() as u32;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(layout.iter().map(|_| Constraint::Ratio(1, row_count)))
        .split(inner);
    let highlighted = app.highlighted(now);

    for (r, (buttons, row_area)) in layout.iter().zip(rows.iter()).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(*row_area);

        for (c, (button, cell)) in buttons.iter().zip(cells.iter()).enumerate() {
            let focused = app.cursor() == Cursor { row: r, col: c };
            let lit = highlighted == Some(button.label);
            render_button(f, *cell, button, focused, lit, palette);
        }
    }
}

fn render_button(
    f: &mut Frame,
    area: Rect,
    button: &Button,
    focused: bool,
    lit: bool,
    palette: &Palette,
) {
    let mut style = palette.button(button.kind);
    if lit {
        style = style.bg(palette.highlight);
    }
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }

    // Vertically centre the label
    let mut lines = vec![Line::from(""); usize::from(area.height.saturating_sub(1) / 2)];
    lines.push(Line::from(button.label));

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).style(style),
        area,
    );
}
