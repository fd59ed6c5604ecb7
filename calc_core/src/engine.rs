//! # Calculator Engine
//!
//! A deterministic state machine over a text display, an accumulator, a
//! pending binary operator and a collection mode for the two calculus keys.
//!
//! ## State
//!
//! ```text
//! EngineState
//! ├── display: String             (formatted number, "Error" or "Infinity")
//! ├── accumulator: Option<f64>    (left operand, or integration lower bound)
//! ├── pending_operator: Option<BinaryOperator>
//! ├── awaiting_fresh_operand: bool
//! ├── mode: Mode                  (Normal / CollectingIntegrationBound / CollectingDerivativePoint)
//! ├── memory: f64
//! └── history: History
//! ```
//!
//! Every input is an [`InputEvent`]; [`EngineState::apply`] performs one
//! transition and reports which persisted parts changed. Chaining is strictly
//! left to right: `3 + 4 * 2 =` is `(3 + 4) * 2 = 14`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::engine::{EngineState, InputEvent};
//! use calc_core::operations::BinaryOperator;
//!
//! let mut state = EngineState::new();
//! for event in [
//!     InputEvent::Digit(3),
//!     InputEvent::Operator(BinaryOperator::Add),
//!     InputEvent::Digit(4),
//!     InputEvent::Operator(BinaryOperator::Mul),
//!     InputEvent::Digit(2),
//!     InputEvent::Equals,
//! ] {
//!     state.apply(event);
//! }
//!
//! assert_eq!(state.display(), "14");
//! assert_eq!(state.history().entries(), ["3 + 4 = 7", "7 * 2 = 14"]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculus::{
    demo_function, derivative_central, integrate_trapezoid, DEMO_FUNCTION_TEXT, DERIVATIVE_STEP,
    INTEGRATION_INTERVALS,
};
use crate::history::History;
use crate::number::{format_number, parse_display, ERROR_TEXT, INFINITY_TEXT};
use crate::operations::{calculate, BinaryOperator, Constant, FunctionOutcome, UnaryFunction};

/// How the next calculus key press interprets the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    /// Lower bound stored in the accumulator, display collects the upper bound
    CollectingIntegrationBound,
    /// Display collects the point to differentiate at
    CollectingDerivativePoint,
}

/// Every input the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A digit 0-9; larger values are ignored
    Digit(u8),
    Dot,
    ToggleSign,
    Percent,
    Operator(BinaryOperator),
    Equals,
    Function(UnaryFunction),
    Constant(Constant),
    /// ∫ key: first press stores the lower bound, second computes
    Integral,
    /// d/dx key: first press starts collection, second computes
    Derivative,
    ClearAll,
    ClearLastChar,
    MemoryAdd,
    MemorySubtract,
    MemoryRecall,
    MemoryClear,
    ClearHistory,
    /// Abort a calculus collection (keypad switch)
    ResetMode,
}

/// Which persisted parts of the state a transition touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    pub history: bool,
    pub memory: bool,
}

impl Changes {
    pub const NONE: Changes = Changes {
        history: false,
        memory: false,
    };
    pub const HISTORY: Changes = Changes {
        history: true,
        memory: false,
    };
    pub const MEMORY: Changes = Changes {
        history: false,
        memory: true,
    };

    pub fn any(&self) -> bool {
        self.history || self.memory
    }
}

/// The complete engine state.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    display: String,
    accumulator: Option<f64>,
    pending_operator: Option<BinaryOperator>,
    awaiting_fresh_operand: bool,
    mode: Mode,
    memory: f64,
    history: History,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState::new()
    }
}

impl EngineState {
    /// Fresh session state: display `"0"`, nothing pending, empty memory and history.
    pub fn new() -> Self {
        EngineState::restored(History::new(), 0.0)
    }

    /// Session state seeded with persisted history and memory.
    ///
    /// Display, accumulator, pending operator and mode never persist.
    pub fn restored(history: History, memory: f64) -> Self {
        EngineState {
            display: "0".to_string(),
            accumulator: None,
            pending_operator: None,
            awaiting_fresh_operand: true,
            mode: Mode::Normal,
            memory,
            history,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn accumulator(&self) -> Option<f64> {
        self.accumulator
    }

    pub fn pending_operator(&self) -> Option<BinaryOperator> {
        self.pending_operator
    }

    pub fn awaiting_fresh_operand(&self) -> bool {
        self.awaiting_fresh_operand
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Secondary display line describing what is pending.
    ///
    /// `"7 +"` while an operator waits for its right operand, `"2 ∫ to"` while
    /// collecting an integration upper bound, `"d/dx at"` while collecting a
    /// derivative point.
    pub fn pending_expression(&self) -> Option<String> {
        match (self.mode, self.accumulator, self.pending_operator) {
            (Mode::Normal, Some(acc), Some(op)) => {
                Some(format!("{} {}", format_number(acc), op.symbol()))
            }
            (Mode::CollectingIntegrationBound, Some(lower), _) => {
                Some(format!("{} ∫ to", format_number(lower)))
            }
            (Mode::CollectingIntegrationBound, None, _) => Some("∫ to".to_string()),
            (Mode::CollectingDerivativePoint, _, _) => Some("d/dx at".to_string()),
            _ => None,
        }
    }

    fn value(&self) -> f64 {
        parse_display(&self.display)
    }

    fn show(&mut self, value: f64) {
        self.display = format_number(value);
    }

    fn record(&mut self, entry: String) -> Changes {
        debug!(entry = %entry, "history entry");
        self.history.push(entry);
        Changes::HISTORY
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Apply one input event.
    pub fn apply(&mut self, event: InputEvent) -> Changes {
        debug!(?event, display = %self.display, mode = ?self.mode, "input");
        match event {
            InputEvent::Digit(d) => {
                self.input_digit(d);
                Changes::NONE
            }
            InputEvent::Dot => {
                self.input_dot();
                Changes::NONE
            }
            InputEvent::ToggleSign => {
                self.toggle_sign();
                Changes::NONE
            }
            InputEvent::Percent => {
                self.input_percent();
                Changes::NONE
            }
            InputEvent::Operator(op) => self.select_operator(op),
            InputEvent::Equals => self.equals(),
            InputEvent::Function(function) => self.apply_function(function),
            InputEvent::Constant(constant) => {
                self.input_constant(constant);
                Changes::NONE
            }
            InputEvent::Integral => self.integral_key(),
            InputEvent::Derivative => self.derivative_key(),
            InputEvent::ClearAll => {
                self.clear_all();
                Changes::NONE
            }
            InputEvent::ClearLastChar => {
                self.clear_last_char();
                Changes::NONE
            }
            InputEvent::MemoryAdd => self.memory_add(),
            InputEvent::MemorySubtract => self.memory_subtract(),
            InputEvent::MemoryRecall => {
                self.memory_recall();
                Changes::NONE
            }
            InputEvent::MemoryClear => self.memory_clear(),
            InputEvent::ClearHistory => self.clear_history(),
            InputEvent::ResetMode => {
                self.reset_mode();
                Changes::NONE
            }
        }
    }

    // ------------------------------------------------------------------
    // Input digesters
    // ------------------------------------------------------------------

    /// Type a digit. A lone `"0"` is replaced rather than extended.
    pub fn input_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        let d = char::from(b'0' + digit);
        if self.awaiting_fresh_operand {
            self.display = d.to_string();
            self.awaiting_fresh_operand = false;
        } else if self.display == "0" {
            self.display = d.to_string();
        } else {
            self.display.push(d);
        }
    }

    /// Type a decimal point; a second point in the same number is ignored.
    pub fn input_dot(&mut self) {
        if self.awaiting_fresh_operand {
            self.display = "0.".to_string();
            self.awaiting_fresh_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Drop the last typed character, falling back to `"0"`.
    pub fn clear_last_char(&mut self) {
        if self.display.chars().count() > 1 {
            self.display.pop();
        } else {
            self.display = "0".to_string();
            self.awaiting_fresh_operand = true;
        }
    }

    pub fn toggle_sign(&mut self) {
        let value = self.value();
        self.show(-value);
    }

    pub fn input_percent(&mut self) {
        let value = self.value();
        self.show(value / 100.0);
    }

    pub fn input_constant(&mut self, constant: Constant) {
        self.show(constant.value());
        self.awaiting_fresh_operand = true;
    }

    /// Reset display and pending state. Memory and history are kept.
    pub fn clear_all(&mut self) {
        self.display = "0".to_string();
        self.accumulator = None;
        self.pending_operator = None;
        self.awaiting_fresh_operand = true;
        self.mode = Mode::Normal;
    }

    // ------------------------------------------------------------------
    // Binary operation pipeline
    // ------------------------------------------------------------------

    /// Select a binary operator, resolving any pending one first.
    ///
    /// Ignored while a calculus collection is active.
    pub fn select_operator(&mut self, op: BinaryOperator) -> Changes {
        if self.mode != Mode::Normal {
            debug!(?op, mode = ?self.mode, "operator ignored during collection");
            return Changes::NONE;
        }

        let input = self.value();
        let mut changes = Changes::NONE;

        match (self.accumulator, self.pending_operator) {
            (None, _) => self.accumulator = Some(input),
            (Some(acc), Some(pending)) => {
                let (result, entry) = resolve(acc, input, pending);
                self.accumulator = Some(result);
                self.show(result);
                changes = self.record(entry);
            }
            (Some(_), None) => {}
        }

        self.awaiting_fresh_operand = true;
        self.pending_operator = Some(op);
        changes
    }

    /// Resolve the pending operation. No-op when nothing is pending.
    pub fn equals(&mut self) -> Changes {
        if self.mode != Mode::Normal {
            return Changes::NONE;
        }
        let (Some(acc), Some(op)) = (self.accumulator, self.pending_operator) else {
            return Changes::NONE;
        };

        let (result, entry) = resolve(acc, self.value(), op);
        let changes = self.record(entry);
        self.show(result);
        self.accumulator = None;
        self.pending_operator = None;
        self.awaiting_fresh_operand = true;
        changes
    }

    // ------------------------------------------------------------------
    // Unary functions
    // ------------------------------------------------------------------

    /// Apply a unary function to the display value.
    ///
    /// Domain errors show `"Error"`, factorial overflow shows `"Infinity"`;
    /// both (and every factorial) leave the engine awaiting a fresh operand.
    pub fn apply_function(&mut self, function: UnaryFunction) -> Changes {
        let outcome = function.apply(self.value());
        let entry = outcome.entry().to_string();

        match outcome {
            FunctionOutcome::Value { result, .. } => {
                self.show(result);
                if function == UnaryFunction::Factorial {
                    self.awaiting_fresh_operand = true;
                }
            }
            FunctionOutcome::DomainError { .. } => {
                self.display = ERROR_TEXT.to_string();
                self.awaiting_fresh_operand = true;
            }
            FunctionOutcome::Overflow { .. } => {
                self.display = INFINITY_TEXT.to_string();
                self.awaiting_fresh_operand = true;
            }
        }

        self.record(entry)
    }

    // ------------------------------------------------------------------
    // Calculus keys
    // ------------------------------------------------------------------

    /// ∫ key. First press stores the display as the lower bound; the second
    /// integrates x² up to the display value.
    pub fn integral_key(&mut self) -> Changes {
        if self.mode != Mode::CollectingIntegrationBound {
            self.accumulator = Some(self.value());
            self.pending_operator = None;
            self.display = "0".to_string();
            self.awaiting_fresh_operand = true;
            self.mode = Mode::CollectingIntegrationBound;
            return Changes::NONE;
        }

        let upper = self.value();
        let lower = nan_as_zero(self.accumulator.unwrap_or(0.0));
        let result = integrate_trapezoid(demo_function, lower, upper, INTEGRATION_INTERVALS);

        let changes = self.record(format!(
            "∫({}) from {} to {} ≈ {}",
            DEMO_FUNCTION_TEXT,
            format_number(lower),
            format_number(upper),
            format_number(result)
        ));
        self.show(result);
        self.mode = Mode::Normal;
        self.awaiting_fresh_operand = true;
        self.accumulator = None;
        changes
    }

    /// d/dx key. First press starts collecting the point; the second
    /// differentiates x² at the display value.
    pub fn derivative_key(&mut self) -> Changes {
        if self.mode != Mode::CollectingDerivativePoint {
            self.accumulator = None;
            self.pending_operator = None;
            self.display = "0".to_string();
            self.awaiting_fresh_operand = true;
            self.mode = Mode::CollectingDerivativePoint;
            return Changes::NONE;
        }

        let x = self.value();
        let result = derivative_central(demo_function, x, DERIVATIVE_STEP);

        let changes = self.record(format!(
            "d/dx({}) at x={} ≈ {}",
            DEMO_FUNCTION_TEXT,
            format_number(x),
            format_number(result)
        ));
        self.show(result);
        self.mode = Mode::Normal;
        self.awaiting_fresh_operand = true;
        changes
    }

    /// Abort any calculus collection without computing or logging.
    pub fn reset_mode(&mut self) {
        if self.mode == Mode::CollectingIntegrationBound {
            self.accumulator = None;
        }
        self.mode = Mode::Normal;
    }

    // ------------------------------------------------------------------
    // Memory register
    // ------------------------------------------------------------------

    pub fn memory_add(&mut self) -> Changes {
        self.memory += self.value();
        self.awaiting_fresh_operand = true;
        Changes::MEMORY
    }

    pub fn memory_subtract(&mut self) -> Changes {
        self.memory -= self.value();
        self.awaiting_fresh_operand = true;
        Changes::MEMORY
    }

    /// Show the memory register; typing continues the recalled number.
    pub fn memory_recall(&mut self) {
        self.show(self.memory);
        self.awaiting_fresh_operand = false;
    }

    pub fn memory_clear(&mut self) -> Changes {
        self.memory = 0.0;
        Changes::MEMORY
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn clear_history(&mut self) -> Changes {
        self.history.clear();
        Changes::HISTORY
    }
}

/// Compute `acc op input` and its history line.
fn resolve(acc: f64, input: f64, op: BinaryOperator) -> (f64, String) {
    let lhs = nan_as_zero(acc);
    let result = calculate(lhs, input, op);
    let entry = format!(
        "{} {} {} = {}",
        format_number(lhs),
        op.symbol(),
        format_number(input),
        format_number(result)
    );
    (result, entry)
}

// A NaN left operand (e.g. stored from an "Error" display) reads as zero
fn nan_as_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InputEvent::*;

    fn run(state: &mut EngineState, events: &[InputEvent]) {
        for event in events {
            state.apply(*event);
        }
    }

    fn digits(state: &mut EngineState, text: &str) {
        for c in text.chars() {
            match c {
                '.' => state.input_dot(),
                _ => state.input_digit(c.to_digit(10).unwrap() as u8),
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let state = EngineState::new();
        assert_eq!(state.display(), "0");
        assert_eq!(state.accumulator(), None);
        assert_eq!(state.pending_operator(), None);
        assert!(state.awaiting_fresh_operand());
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.memory(), 0.0);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_digits_concatenate() {
        let mut state = EngineState::new();
        digits(&mut state, "1203");
        assert_eq!(state.display(), "1203");
    }

    #[test]
    fn test_leading_zero_suppressed() {
        let mut state = EngineState::new();
        digits(&mut state, "05");
        assert_eq!(state.display(), "5");

        let mut state = EngineState::new();
        digits(&mut state, "007");
        assert_eq!(state.display(), "7");
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let mut state = EngineState::new();
        state.apply(Digit(12));
        assert_eq!(state.display(), "0");
        assert!(state.awaiting_fresh_operand());
    }

    #[test]
    fn test_dot_is_idempotent() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(3), Dot, Dot, Digit(1), Dot]);
        assert_eq!(state.display(), "3.1");
    }

    #[test]
    fn test_dot_starts_fresh_operand() {
        let mut state = EngineState::new();
        run(&mut state, &[Dot, Digit(5)]);
        assert_eq!(state.display(), "0.5");
    }

    #[test]
    fn test_clear_last_char() {
        let mut state = EngineState::new();
        digits(&mut state, "42");
        state.apply(ClearLastChar);
        assert_eq!(state.display(), "4");
        state.apply(ClearLastChar);
        assert_eq!(state.display(), "0");
        assert!(state.awaiting_fresh_operand());
    }

    #[test]
    fn test_clear_last_char_on_error_text() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(1), ToggleSign, Function(UnaryFunction::Factorial)]);
        assert_eq!(state.display(), "Error");
        state.apply(ClearLastChar);
        assert_eq!(state.display(), "Erro");
    }

    #[test]
    fn test_toggle_sign_and_percent() {
        let mut state = EngineState::new();
        digits(&mut state, "50");
        state.apply(ToggleSign);
        assert_eq!(state.display(), "-50");
        state.apply(Percent);
        assert_eq!(state.display(), "-0.5");
        state.apply(ToggleSign);
        assert_eq!(state.display(), "0.5");
    }

    #[test]
    fn test_toggle_sign_keeps_fresh_flag() {
        let mut state = EngineState::new();
        state.apply(ToggleSign);
        assert_eq!(state.display(), "0");
        assert!(state.awaiting_fresh_operand());
    }

    #[test]
    fn test_chaining_has_no_precedence() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[
                Digit(3),
                Operator(BinaryOperator::Add),
                Digit(4),
                Operator(BinaryOperator::Mul),
                Digit(2),
                Equals,
            ],
        );
        assert_eq!(state.display(), "14");
        assert_eq!(state.history().entries(), ["3 + 4 = 7", "7 * 2 = 14"]);
        assert_eq!(state.accumulator(), None);
        assert_eq!(state.pending_operator(), None);
        assert!(state.awaiting_fresh_operand());
    }

    #[test]
    fn test_two_plus_three_times_four() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[
                Digit(2),
                Operator(BinaryOperator::Add),
                Digit(3),
                Operator(BinaryOperator::Mul),
                Digit(4),
                Equals,
            ],
        );
        assert_eq!(state.display(), "20");
    }

    #[test]
    fn test_intermediate_result_shown() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[Digit(6), Operator(BinaryOperator::Sub), Digit(2), Operator(BinaryOperator::Div)],
        );
        assert_eq!(state.display(), "4");
        assert_eq!(state.accumulator(), Some(4.0));
        assert_eq!(state.pending_operator(), Some(BinaryOperator::Div));
        assert_eq!(state.pending_expression().as_deref(), Some("4 /"));
    }

    #[test]
    fn test_equals_without_pending_is_noop() {
        let mut state = EngineState::new();
        digits(&mut state, "42");
        let before = state.clone();
        let changes = state.apply(Equals);
        assert_eq!(changes, Changes::NONE);
        assert_eq!(state, before);
    }

    #[test]
    fn test_advanced_binary_operators() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(2), Operator(BinaryOperator::Pow), Digit(1), Digit(0), Equals]);
        assert_eq!(state.display(), "1024");
        assert_eq!(state.history().last(), Some("2 x^y 10 = 1024"));

        run(&mut state, &[Digit(1), Digit(7), Operator(BinaryOperator::Mod), Digit(5), Equals]);
        assert_eq!(state.display(), "2");
        assert_eq!(state.history().last(), Some("17 mod 5 = 2"));

        run(&mut state, &[Digit(2), Operator(BinaryOperator::LogBase), Digit(8), Equals]);
        assert!((parse_display(state.display()) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_division_by_zero_shows_infinity() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(1), Operator(BinaryOperator::Div), Digit(0), Equals]);
        assert_eq!(state.display(), "Infinity");
        assert_eq!(state.history().last(), Some("1 / 0 = Infinity"));
    }

    #[test]
    fn test_one_to_the_infinity_is_nan() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[
                Digit(1),
                Operator(BinaryOperator::Pow),
                Digit(1),
                Digit(7),
                Digit(1),
                Function(UnaryFunction::Factorial),
                Equals,
            ],
        );
        assert_eq!(state.display(), "NaN");
        assert_eq!(state.history().last(), Some("1 x^y Infinity = NaN"));
    }

    #[test]
    fn test_operator_after_equals_continues_from_result() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[Digit(5), Operator(BinaryOperator::Add), Digit(5), Equals, Operator(BinaryOperator::Mul), Digit(3), Equals],
        );
        assert_eq!(state.display(), "30");
    }

    #[test]
    fn test_factorial_outcomes() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(5), Function(UnaryFunction::Factorial)]);
        assert_eq!(state.display(), "120");
        assert!(state.awaiting_fresh_operand());

        run(&mut state, &[Digit(1), ToggleSign, Function(UnaryFunction::Factorial)]);
        assert_eq!(state.display(), "Error");
        assert!(state.awaiting_fresh_operand());

        run(&mut state, &[Digit(1), Digit(7), Digit(1), Function(UnaryFunction::Factorial)]);
        assert_eq!(state.display(), "Infinity");
        assert_eq!(state.history().last(), Some("171! = Infinity (too large)"));
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_error_display_recovers_on_next_digit() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(2), Function(UnaryFunction::Asin)]);
        assert_eq!(state.display(), "Error");
        assert_eq!(state.history().last(), Some("asin(2) = Error: Domain error"));
        state.apply(Digit(7));
        assert_eq!(state.display(), "7");
    }

    #[test]
    fn test_asin_of_one_is_ninety_degrees() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(1), Function(UnaryFunction::Asin)]);
        assert!((parse_display(state.display()) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_unary_function_keeps_pending_operation() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[Digit(2), Operator(BinaryOperator::Add), Digit(9), Function(UnaryFunction::SquareRoot), Equals],
        );
        assert_eq!(state.display(), "5");
        assert_eq!(state.history().entries(), ["√(9) = 3", "2 + 3 = 5"]);
    }

    #[test]
    fn test_constants_have_no_history() {
        let mut state = EngineState::new();
        let changes = state.apply(InputEvent::Constant(crate::operations::Constant::Pi));
        assert_eq!(changes, Changes::NONE);
        assert_eq!(state.display(), format_number(std::f64::consts::PI));
        assert!(state.awaiting_fresh_operand());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_integral_two_phase() {
        let mut state = EngineState::new();
        state.apply(Digit(0));
        assert_eq!(state.apply(Integral), Changes::NONE);
        assert_eq!(state.mode(), Mode::CollectingIntegrationBound);
        assert_eq!(state.display(), "0");
        assert_eq!(state.pending_expression().as_deref(), Some("0 ∫ to"));

        state.apply(Digit(1));
        assert_eq!(state.apply(Integral), Changes::HISTORY);

        let result = parse_display(state.display());
        assert!((result - 1.0 / 3.0).abs() < 1e-6);
        assert!((result - 0.3335).abs() < 1e-3);
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.accumulator(), None);
        assert!(state
            .history()
            .last()
            .unwrap()
            .starts_with("∫(x^2) from 0 to 1 ≈ 0.33333"));
    }

    #[test]
    fn test_derivative_two_phase() {
        let mut state = EngineState::new();
        state.apply(Digit(3));
        state.apply(Derivative);
        assert_eq!(state.mode(), Mode::CollectingDerivativePoint);
        assert_eq!(state.display(), "0");

        state.apply(Digit(3));
        state.apply(Derivative);
        assert!((parse_display(state.display()) - 6.0).abs() < 1e-6);
        assert_eq!(state.mode(), Mode::Normal);
        assert!(state.history().last().unwrap().starts_with("d/dx(x^2) at x=3 ≈ "));
    }

    #[test]
    fn test_collection_discards_pending_operator() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(4), Operator(BinaryOperator::Add), Digit(1), Integral]);
        assert_eq!(state.pending_operator(), None);
        assert_eq!(state.accumulator(), Some(1.0));
    }

    #[test]
    fn test_operators_ignored_during_collection() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(1), Integral, Digit(2), Operator(BinaryOperator::Add), Equals]);
        assert_eq!(state.mode(), Mode::CollectingIntegrationBound);
        assert_eq!(state.pending_operator(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_switching_calculus_keys() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(2), Integral, Derivative]);
        assert_eq!(state.mode(), Mode::CollectingDerivativePoint);
        assert_eq!(state.accumulator(), None);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_reset_mode_aborts_collection() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(2), Integral, Digit(5), ResetMode]);
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.accumulator(), None);
        assert!(state.history().is_empty());

        run(&mut state, &[Derivative, Digit(4), ResetMode]);
        assert_eq!(state.mode(), Mode::Normal);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_reset_mode_keeps_pending_operation() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(2), Operator(BinaryOperator::Add), ResetMode]);
        assert_eq!(state.accumulator(), Some(2.0));
        assert_eq!(state.pending_operator(), Some(BinaryOperator::Add));
    }

    #[test]
    fn test_clear_all_keeps_memory_and_history() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[Digit(9), MemoryAdd, Digit(1), Operator(BinaryOperator::Add), Digit(1), Equals, Digit(3), Integral],
        );
        state.apply(ClearAll);
        assert_eq!(state.display(), "0");
        assert_eq!(state.accumulator(), None);
        assert_eq!(state.pending_operator(), None);
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.memory(), 9.0);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_memory_roundtrip() {
        let mut state = EngineState::new();
        state.apply(Digit(5));
        assert_eq!(state.apply(MemoryAdd), Changes::MEMORY);
        assert_eq!(state.memory(), 5.0);
        state.apply(MemoryClear);
        state.apply(MemoryRecall);
        assert_eq!(state.display(), "0");
    }

    #[test]
    fn test_memory_subtract_and_recall_continues_typing() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(8), MemoryAdd, Digit(3), MemorySubtract, MemoryRecall]);
        assert_eq!(state.display(), "5");
        assert!(!state.awaiting_fresh_operand());
        state.apply(Digit(1));
        assert_eq!(state.display(), "51");
    }

    #[test]
    fn test_history_append_only_and_clear() {
        let mut state = EngineState::new();
        run(
            &mut state,
            &[
                Digit(4),
                Function(UnaryFunction::Square),
                Function(UnaryFunction::SquareRoot),
                Operator(BinaryOperator::Add),
                Digit(1),
                Equals,
            ],
        );
        assert_eq!(state.history().entries(), ["4² = 16", "√(16) = 4", "4 + 1 = 5"]);
        assert_eq!(state.apply(ClearHistory), Changes::HISTORY);
        assert_eq!(state.history().len(), 0);
    }

    #[test]
    fn test_nan_accumulator_reads_as_zero() {
        let mut state = EngineState::new();
        run(&mut state, &[Digit(3), Function(UnaryFunction::Acos)]);
        run(&mut state, &[Operator(BinaryOperator::Add), Digit(4), Equals]);
        assert_eq!(state.display(), "4");
        assert_eq!(state.history().last(), Some("0 + 4 = 4"));
    }

    #[test]
    fn test_restored_state() {
        let history = History::from(vec!["1 + 1 = 2".to_string()]);
        let state = EngineState::restored(history.clone(), 12.5);
        assert_eq!(state.history(), &history);
        assert_eq!(state.memory(), 12.5);
        assert_eq!(state.display(), "0");
    }
}
