//! # Calculator Session
//!
//! Ties an [`EngineState`] to a [`PersistencePort`]. Every dispatched event is
//! applied to the engine and whatever it changed (history, memory) is written
//! through the port before the call returns.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::engine::InputEvent;
//! use calc_core::persistence::{MemoryStore, PersistencePort, MEMORY_KEY};
//! use calc_core::session::Calculator;
//!
//! let store = MemoryStore::new();
//! let mut calc = Calculator::new(Box::new(store.clone()));
//!
//! calc.dispatch(InputEvent::Digit(9));
//! calc.dispatch(InputEvent::MemoryAdd);
//!
//! assert_eq!(calc.memory(), 9.0);
//! assert_eq!(store.load(MEMORY_KEY).unwrap().as_deref(), Some("9"));
//! ```

use tracing::info;

use crate::engine::{Changes, EngineState, InputEvent, Mode};
use crate::history::History;
use crate::operations::BinaryOperator;
use crate::persistence::{
    save_dark_mode, save_history, save_memory, PersistedSession, PersistencePort,
};

/// A running calculator: engine state plus its persistence.
pub struct Calculator {
    state: EngineState,
    store: Box<dyn PersistencePort>,
    dark_mode: bool,
}

impl Calculator {
    /// Start a session, restoring history, memory and theme from `store`.
    pub fn new(store: Box<dyn PersistencePort>) -> Self {
        let restored = PersistedSession::load(store.as_ref());
        info!(
            history = restored.history.len(),
            memory = restored.memory,
            dark_mode = restored.dark_mode,
            "session restored"
        );
        Calculator {
            state: EngineState::restored(restored.history, restored.memory),
            store,
            dark_mode: restored.dark_mode,
        }
    }

    /// Apply one event and persist what it changed.
    pub fn dispatch(&mut self, event: InputEvent) -> Changes {
        let changes = self.state.apply(event);
        self.persist(changes);
        changes
    }

    /// Abandon any calculus collection.
    pub fn reset_mode(&mut self) {
        self.dispatch(InputEvent::ResetMode);
    }

    /// Flip and persist the theme preference. Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        save_dark_mode(self.store.as_mut(), self.dark_mode);
        self.dark_mode
    }

    fn persist(&mut self, changes: Changes) {
        if changes.history {
            save_history(self.store.as_mut(), self.state.history());
        }
        if changes.memory {
            save_memory(self.store.as_mut(), self.state.memory());
        }
    }

    pub fn display(&self) -> &str {
        self.state.display()
    }

    pub fn pending_expression(&self) -> Option<String> {
        self.state.pending_expression()
    }

    pub fn memory(&self) -> f64 {
        self.state.memory()
    }

    pub fn history(&self) -> &History {
        self.state.history()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn pending_operator(&self) -> Option<BinaryOperator> {
        self.state.pending_operator()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Full engine state, read-only
    pub fn state(&self) -> &EngineState {
        &self.state
    }
}
