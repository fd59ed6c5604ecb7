//! # Operation Tables
//!
//! Pure numeric operations behind the engine:
//!
//! - [`BinaryOperator`] and [`calculate`] - the calculation table for chained `a op b`
//! - [`UnaryFunction`] - single-operand functions with their history line format
//! - [`Constant`] - keys that place a constant on the display
//!
//! Nothing here guards IEEE edge cases unless listed: `1/0`, `ln(-1)`, `√(-4)`
//! produce infinity or NaN and are shown as-is. Only factorial and
//! `asin`/`acos` are domain-checked.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::operations::{calculate, BinaryOperator, FunctionOutcome, UnaryFunction};
//!
//! assert_eq!(calculate(2.0, 10.0, BinaryOperator::Pow), 1024.0);
//!
//! match UnaryFunction::SquareRoot.apply(9.0) {
//!     FunctionOutcome::Value { result, entry } => {
//!         assert_eq!(result, 3.0);
//!         assert_eq!(entry, "√(9) = 3");
//!     }
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

use std::f64::consts::{E, PI};

use serde::{Deserialize, Serialize};

use crate::number::{format_number, round_half_up};

/// Largest n for which n! is finite in double precision
pub const FACTORIAL_LIMIT: f64 = 170.0;

// ============================================================================
// Binary operators
// ============================================================================

/// Binary operators that can be pending between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    /// a raised to b
    Pow,
    /// log base a of b
    LogBase,
    /// Remainder, sign follows the dividend
    Mod,
}

impl BinaryOperator {
    /// Symbol written into history lines (`+ - * / x^y log mod`)
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Pow => "x^y",
            BinaryOperator::LogBase => "log",
            BinaryOperator::Mod => "mod",
        }
    }

    /// Label shown on the keypad
    pub fn glyph(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "−",
            BinaryOperator::Mul => "×",
            BinaryOperator::Div => "÷",
            BinaryOperator::Pow => "x^y",
            BinaryOperator::LogBase => "logₓ",
            BinaryOperator::Mod => "mod",
        }
    }
}

/// Apply a binary operator: the calculation table.
pub fn calculate(a: f64, b: f64, op: BinaryOperator) -> f64 {
    match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Pow => power(a, b),
        BinaryOperator::LogBase => b.ln() / a.ln(),
        BinaryOperator::Mod => a % b,
    }
}

/// `a` raised to `b`, with NaN where `powf` would give 1 for `1^∞`, `(-1)^∞`
/// or `1^NaN`.
fn power(a: f64, b: f64) -> f64 {
    if b.is_nan() || (a.abs() == 1.0 && b.is_infinite()) {
        return f64::NAN;
    }
    a.powf(b)
}

// ============================================================================
// Unary functions
// ============================================================================

/// Result of applying a unary function to the display value.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutcome {
    /// Computed a value (possibly infinite or NaN for unguarded cases)
    Value { result: f64, entry: String },
    /// Input outside the function's domain; display becomes `"Error"`
    DomainError { entry: String },
    /// Result too large to represent; display becomes `"Infinity"`
    Overflow { entry: String },
}

impl FunctionOutcome {
    /// The history line for this outcome
    pub fn entry(&self) -> &str {
        match self {
            FunctionOutcome::Value { entry, .. }
            | FunctionOutcome::DomainError { entry }
            | FunctionOutcome::Overflow { entry } => entry,
        }
    }
}

/// Single-operand functions on the display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFunction {
    SquareRoot,
    Square,
    Cube,
    CubeRoot,
    Reciprocal,
    /// Input in degrees
    Sin,
    /// Input in degrees
    Cos,
    /// Input in degrees
    Tan,
    /// Output in degrees, input must be in [-1, 1]
    Asin,
    /// Output in degrees, input must be in [-1, 1]
    Acos,
    /// Output in degrees
    Atan,
    Log10,
    Ln,
    Exp,
    Abs,
    Floor,
    Ceil,
    Round,
    Factorial,
}

impl UnaryFunction {
    /// Keypad label
    pub fn label(&self) -> &'static str {
        match self {
            UnaryFunction::SquareRoot => "√",
            UnaryFunction::Square => "x²",
            UnaryFunction::Cube => "x³",
            UnaryFunction::CubeRoot => "∛",
            UnaryFunction::Reciprocal => "1/x",
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Asin => "asin",
            UnaryFunction::Acos => "acos",
            UnaryFunction::Atan => "atan",
            UnaryFunction::Log10 => "log",
            UnaryFunction::Ln => "ln",
            UnaryFunction::Exp => "e^x",
            UnaryFunction::Abs => "|x|",
            UnaryFunction::Floor => "⌊x⌋",
            UnaryFunction::Ceil => "⌈x⌉",
            UnaryFunction::Round => "round",
            UnaryFunction::Factorial => "x!",
        }
    }

    /// Compute the function and its history line.
    pub fn apply(&self, x: f64) -> FunctionOutcome {
        let v = format_number(x);
        let (result, entry) = match self {
            UnaryFunction::SquareRoot => {
                let r = x.sqrt();
                (r, format!("√({}) = {}", v, format_number(r)))
            }
            UnaryFunction::Square => {
                let r = x * x;
                (r, format!("{}² = {}", v, format_number(r)))
            }
            UnaryFunction::Cube => {
                let r = x * x * x;
                (r, format!("{}³ = {}", v, format_number(r)))
            }
            UnaryFunction::CubeRoot => {
                let r = x.cbrt();
                (r, format!("∛({}) = {}", v, format_number(r)))
            }
            UnaryFunction::Reciprocal => {
                let r = 1.0 / x;
                (r, format!("1/{} = {}", v, format_number(r)))
            }
            UnaryFunction::Sin => {
                let r = degrees_to_radians(x).sin();
                (r, format!("sin({}°) = {}", v, format_number(r)))
            }
            UnaryFunction::Cos => {
                let r = degrees_to_radians(x).cos();
                (r, format!("cos({}°) = {}", v, format_number(r)))
            }
            UnaryFunction::Tan => {
                let r = degrees_to_radians(x).tan();
                (r, format!("tan({}°) = {}", v, format_number(r)))
            }
            UnaryFunction::Asin | UnaryFunction::Acos => {
                let name = if *self == UnaryFunction::Asin { "asin" } else { "acos" };
                if x < -1.0 || x > 1.0 {
                    return FunctionOutcome::DomainError {
                        entry: format!("{}({}) = Error: Domain error", name, v),
                    };
                }
                let radians = if *self == UnaryFunction::Asin { x.asin() } else { x.acos() };
                let r = radians_to_degrees(radians);
                (r, format!("{}({}) = {}°", name, v, format_number(r)))
            }
            UnaryFunction::Atan => {
                let r = radians_to_degrees(x.atan());
                (r, format!("atan({}) = {}°", v, format_number(r)))
            }
            UnaryFunction::Log10 => {
                let r = x.log10();
                (r, format!("log({}) = {}", v, format_number(r)))
            }
            UnaryFunction::Ln => {
                let r = x.ln();
                (r, format!("ln({}) = {}", v, format_number(r)))
            }
            UnaryFunction::Exp => {
                let r = x.exp();
                (r, format!("e^{} = {}", v, format_number(r)))
            }
            UnaryFunction::Abs => {
                let r = x.abs();
                (r, format!("|{}| = {}", v, format_number(r)))
            }
            UnaryFunction::Floor => {
                let r = x.floor();
                (r, format!("⌊{}⌋ = {}", v, format_number(r)))
            }
            UnaryFunction::Ceil => {
                let r = x.ceil();
                (r, format!("⌈{}⌉ = {}", v, format_number(r)))
            }
            UnaryFunction::Round => {
                let r = round_half_up(x);
                (r, format!("round({}) = {}", v, format_number(r)))
            }
            UnaryFunction::Factorial => return factorial(x),
        };
        FunctionOutcome::Value { result, entry }
    }
}

fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

// f64::to_degrees uses a different constant; asin(1) must read exactly 90
fn radians_to_degrees(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// Iterative factorial with domain and overflow checks.
fn factorial(x: f64) -> FunctionOutcome {
    let v = format_number(x);

    // NaN fails the integer test too
    if x < 0.0 || x.fract() != 0.0 || !x.is_finite() {
        return FunctionOutcome::DomainError {
            entry: format!("{}! = Error: Factorial requires a non-negative integer", v),
        };
    }

    if x > FACTORIAL_LIMIT {
        return FunctionOutcome::Overflow {
            entry: format!("{}! = Infinity (too large)", v),
        };
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= x {
        result *= i;
        i += 1.0;
    }

    FunctionOutcome::Value {
        result,
        entry: format!("{}! = {}", v, format_number(result)),
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Constants placed directly on the display (no history line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }
}
