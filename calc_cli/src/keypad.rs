//! Keypad layouts and focus movement.
//!
//! Two grids, four columns wide. Rows may be shorter than four buttons; the
//! focus cursor is clamped to the row it lands on.

use calc_core::engine::InputEvent;
use calc_core::operations::{BinaryOperator, Constant, UnaryFunction};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::Action;

/// Buttons per row
pub const COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeypadKind {
    #[default]
    Basic,
    Advanced,
}

impl KeypadKind {
    pub fn toggled(self) -> Self {
        match self {
            KeypadKind::Basic => KeypadKind::Advanced,
            KeypadKind::Advanced => KeypadKind::Basic,
        }
    }

    /// Header title
    pub fn title(self) -> &'static str {
        match self {
            KeypadKind::Basic => "Calculator",
            KeypadKind::Advanced => "Advanced",
        }
    }

    pub fn layout(self) -> &'static [Vec<Button>] {
        match self {
            KeypadKind::Basic => &BASIC,
            KeypadKind::Advanced => &ADVANCED,
        }
    }
}

/// Drives button colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Digit,
    Function,
    Operation,
    Equals,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub kind: ButtonKind,
    pub action: Action,
}

const fn digit(d: u8, label: &'static str) -> Button {
    Button {
        label,
        kind: ButtonKind::Digit,
        action: Action::Input(InputEvent::Digit(d)),
    }
}

fn function(f: UnaryFunction) -> Button {
    Button {
        label: f.label(),
        kind: ButtonKind::Function,
        action: Action::Input(InputEvent::Function(f)),
    }
}

fn operator(op: BinaryOperator) -> Button {
    Button {
        label: op.glyph(),
        kind: ButtonKind::Operation,
        action: Action::Input(InputEvent::Operator(op)),
    }
}

fn constant(c: Constant) -> Button {
    control(InputEvent::Constant(c), c.label())
}

const fn control(event: InputEvent, label: &'static str) -> Button {
    Button {
        label,
        kind: ButtonKind::Function,
        action: Action::Input(event),
    }
}

const fn memory(event: InputEvent, label: &'static str) -> Button {
    Button {
        label,
        kind: ButtonKind::Memory,
        action: Action::Input(event),
    }
}

const EQUALS: Button = Button {
    label: "=",
    kind: ButtonKind::Equals,
    action: Action::Input(InputEvent::Equals),
};

const DOT: Button = Button {
    label: ".",
    kind: ButtonKind::Digit,
    action: Action::Input(InputEvent::Dot),
};

fn digit_rows() -> [Vec<Button>; 3] {
    [
        vec![
            digit(7, "7"),
            digit(8, "8"),
            digit(9, "9"),
            operator(BinaryOperator::Mul),
        ],
        vec![
            digit(4, "4"),
            digit(5, "5"),
            digit(6, "6"),
            operator(BinaryOperator::Sub),
        ],
        vec![
            digit(1, "1"),
            digit(2, "2"),
            digit(3, "3"),
            operator(BinaryOperator::Add),
        ],
    ]
}

pub static BASIC: Lazy<Vec<Vec<Button>>> = Lazy::new(|| {
    let mut rows = vec![
        vec![
            memory(InputEvent::MemoryClear, "MC"),
            memory(InputEvent::MemoryRecall, "MR"),
            memory(InputEvent::MemoryAdd, "M+"),
            memory(InputEvent::MemorySubtract, "M-"),
        ],
        vec![
            function(UnaryFunction::Sin),
            function(UnaryFunction::Cos),
            function(UnaryFunction::Tan),
            operator(BinaryOperator::Pow),
        ],
        vec![
            function(UnaryFunction::Log10),
            function(UnaryFunction::Ln),
            function(UnaryFunction::SquareRoot),
            function(UnaryFunction::Factorial),
        ],
        vec![
            control(InputEvent::ClearAll, "C"),
            control(InputEvent::ToggleSign, "±"),
            control(InputEvent::Percent, "%"),
            operator(BinaryOperator::Div),
        ],
    ];
    rows.extend(digit_rows());
    rows.push(vec![
        function(UnaryFunction::Square),
        digit(0, "0"),
        DOT,
        EQUALS,
    ]);
    rows
});

pub static ADVANCED: Lazy<Vec<Vec<Button>>> = Lazy::new(|| {
    let mut rows = vec![
        vec![
            Button {
                label: "Back",
                kind: ButtonKind::Function,
                action: Action::ToggleKeypad,
            },
            constant(Constant::Pi),
            constant(Constant::E),
            function(UnaryFunction::Exp),
        ],
        vec![
            function(UnaryFunction::Asin),
            function(UnaryFunction::Acos),
            function(UnaryFunction::Atan),
            function(UnaryFunction::Abs),
        ],
        vec![
            control(InputEvent::Integral, "∫"),
            control(InputEvent::Derivative, "d/dx"),
            function(UnaryFunction::Cube),
            function(UnaryFunction::CubeRoot),
        ],
        vec![
            function(UnaryFunction::Floor),
            function(UnaryFunction::Ceil),
            function(UnaryFunction::Round),
            operator(BinaryOperator::Mod),
        ],
        vec![
            control(InputEvent::ClearAll, "C"),
            control(InputEvent::ToggleSign, "±"),
            function(UnaryFunction::Reciprocal),
            operator(BinaryOperator::Div),
        ],
    ];
    rows.extend(digit_rows());
    rows.push(vec![
        control(InputEvent::ClearLastChar, "⌫"),
        digit(0, "0"),
        DOT,
        EQUALS,
    ]);
    rows
});

/// Label of the first button on `kind` that performs `action`.
pub fn label_for(kind: KeypadKind, action: Action) -> Option<&'static str> {
    kind.layout()
        .iter()
        .flatten()
        .find(|button| button.action == action)
        .map(|button| button.label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Up,
    Down,
    Left,
    Right,
}

/// Focused grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Move one cell, stopping at the grid edges.
    pub fn moved(self, layout: &[Vec<Button>], step: FocusMove) -> Cursor {
        if layout.is_empty() {
            return Cursor::default();
        }
        let last_row = layout.len() - 1;
        let (row, col) = match step {
            FocusMove::Up => (self.row.saturating_sub(1), self.col),
            FocusMove::Down => ((self.row + 1).min(last_row), self.col),
            FocusMove::Left => (self.row, self.col.saturating_sub(1)),
            FocusMove::Right => (self.row, self.col + 1),
        };
        Cursor { row, col }.clamped(layout)
    }

    /// Pull the cursor back inside `layout`.
    pub fn clamped(self, layout: &[Vec<Button>]) -> Cursor {
        let row = self.row.min(layout.len().saturating_sub(1));
        let width = layout.get(row).map_or(0, Vec::len);
        Cursor {
            row,
            col: self.col.min(width.saturating_sub(1)),
        }
    }

    pub fn button(self, layout: &[Vec<Button>]) -> Option<Button> {
        layout.get(self.row)?.get(self.col).copied()
    }
}
