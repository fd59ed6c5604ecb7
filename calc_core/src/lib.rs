//! # calc_core - Calculator Engine
//!
//! `calc_core` is the computational heart of Calci: a deterministic calculator
//! state machine with a running chain of binary operations, a library of
//! unary functions, two numerical calculus keys, a memory register and an
//! append-only history log. It knows nothing about terminals or key codes.
//!
//! ## Design Philosophy
//!
//! - **Event-driven**: One [`InputEvent`] in, one state transition out
//! - **No panics on bad math**: Domain errors become display state and history lines
//! - **Rich Errors**: Structured error types for persistence, not just strings
//! - **Pluggable storage**: Persistence goes through a small port trait
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{Calculator, InputEvent, MemoryStore};
//! use calc_core::operations::BinaryOperator;
//!
//! let mut calc = Calculator::new(Box::new(MemoryStore::new()));
//! calc.dispatch(InputEvent::Digit(6));
//! calc.dispatch(InputEvent::Operator(BinaryOperator::Div));
//! calc.dispatch(InputEvent::Digit(4));
//! calc.dispatch(InputEvent::Equals);
//!
//! assert_eq!(calc.display(), "1.5");
//! assert_eq!(calc.history().last(), Some("6 / 4 = 1.5"));
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The state machine and its input events
//! - [`operations`] - Binary calculation table, unary functions, constants
//! - [`calculus`] - Trapezoidal integration and central-difference derivative
//! - [`number`] - Display text formatting and parsing
//! - [`history`] - The history log
//! - [`persistence`] - Persistence port, in-memory store, load/save helpers
//! - [`file_io`] - File-backed store with atomic saves and locking
//! - [`session`] - Engine plus persistence
//! - [`errors`] - Structured error types

pub mod calculus;
pub mod engine;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod history;
pub mod number;
pub mod operations;
pub mod persistence;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use engine::{Changes, EngineState, InputEvent, Mode};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::FileStore;
pub use history::History;
pub use persistence::{MemoryStore, PersistencePort};
pub use session::Calculator;
