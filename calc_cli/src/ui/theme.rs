//! Light and dark colour palettes.

use ratatui::style::{Color, Modifier, Style};

use crate::keypad::ButtonKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub digit: Color,
    pub function: Color,
    pub operation: Color,
    pub equals: Color,
    pub memory: Color,
    pub highlight: Color,
}

pub const LIGHT: Palette = Palette {
    background: Color::White,
    text: Color::Black,
    muted: Color::Gray,
    border: Color::Gray,
    digit: Color::Black,
    function: Color::DarkGray,
    operation: Color::Blue,
    equals: Color::Blue,
    memory: Color::Magenta,
    highlight: Color::LightBlue,
};

pub const DARK: Palette = Palette {
    background: Color::Rgb(17, 24, 39),
    text: Color::Rgb(243, 244, 246),
    muted: Color::Rgb(156, 163, 175),
    border: Color::Rgb(55, 65, 81),
    digit: Color::Rgb(243, 244, 246),
    function: Color::Rgb(209, 213, 219),
    operation: Color::Rgb(96, 165, 250),
    equals: Color::Rgb(96, 165, 250),
    memory: Color::Rgb(192, 132, 252),
    highlight: Color::Rgb(30, 64, 175),
};

impl Palette {
    pub fn for_mode(dark: bool) -> Palette {
        if dark {
            DARK
        } else {
            LIGHT
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted).bg(self.background)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.background)
    }

    pub fn button(&self, kind: ButtonKind) -> Style {
        let fg = match kind {
            ButtonKind::Digit => self.digit,
            ButtonKind::Function => self.function,
            ButtonKind::Operation => self.operation,
            ButtonKind::Equals => self.equals,
            ButtonKind::Memory => self.memory,
        };
        let style = Style::default().fg(fg).bg(self.background);
        if kind == ButtonKind::Equals {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
