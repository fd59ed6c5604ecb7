//! # Persistence Port
//!
//! Best-effort key-value storage for the parts of a session that outlive it:
//! the history log, the memory register and the theme preference.
//!
//! | key | value |
//! |---|---|
//! | `calculatorHistory` | JSON array of strings |
//! | `calculatorMemory` | number as text |
//! | `calculatorDarkMode` | `"true"` / `"false"` |
//!
//! Loading never fails: a missing or malformed value falls back to its
//! default. Saving never fails either: errors are logged and dropped, and the
//! session carries on in memory.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::history::History;
//! use calc_core::persistence::{save_memory, MemoryStore, PersistedSession};
//!
//! let mut store = MemoryStore::new();
//! save_memory(&mut store, 42.0);
//!
//! let session = PersistedSession::load(&store);
//! assert_eq!(session.memory, 42.0);
//! assert_eq!(session.history, History::new());
//! assert!(!session.dark_mode);
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::history::History;
use crate::number::{format_number, parse_display};

/// Key for the history log
pub const HISTORY_KEY: &str = "calculatorHistory";

/// Key for the memory register
pub const MEMORY_KEY: &str = "calculatorMemory";

/// Key for the theme preference
pub const DARK_MODE_KEY: &str = "calculatorDarkMode";

/// String-addressed key-value storage.
pub trait PersistencePort: Send {
    /// Read a value; `Ok(None)` when the key was never saved.
    fn load(&self, key: &str) -> CalcResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn save(&mut self, key: &str, value: &str) -> CalcResult<()>;
}

impl<P: PersistencePort + ?Sized> PersistencePort for Box<P> {
    fn load(&self, key: &str) -> CalcResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> CalcResult<()> {
        (**self).save(key, value)
    }
}

/// Persisted parts of a session, with defaults applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistedSession {
    pub history: History,
    pub memory: f64,
    pub dark_mode: bool,
}

impl PersistedSession {
    /// Load every persisted key, falling back to defaults on any problem.
    pub fn load(port: &dyn PersistencePort) -> Self {
        PersistedSession {
            history: load_or_default(port, HISTORY_KEY, |raw| History::from_json(raw)),
            memory: load_or_default(port, MEMORY_KEY, parse_memory),
            dark_mode: load_or_default(port, DARK_MODE_KEY, |raw| Ok(raw == "true")),
        }
    }
}

fn load_or_default<T: Default>(
    port: &dyn PersistencePort,
    key: &str,
    parse: impl FnOnce(&str) -> CalcResult<T>,
) -> T {
    match port.load(key) {
        Ok(Some(raw)) => parse(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "ignoring malformed persisted value");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to load persisted value");
            T::default()
        }
    }
}

fn parse_memory(raw: &str) -> CalcResult<f64> {
    let value = parse_display(raw);
    if value.is_nan() {
        return Err(CalcError::invalid_input(MEMORY_KEY, raw, "Memory register must be a number"));
    }
    Ok(value)
}

/// Persist the history log. Failures are logged, never returned.
pub fn save_history(port: &mut dyn PersistencePort, history: &History) {
    let result = history.to_json().and_then(|json| port.save(HISTORY_KEY, &json));
    report(HISTORY_KEY, result);
}

/// Persist the memory register. Failures are logged, never returned.
pub fn save_memory(port: &mut dyn PersistencePort, memory: f64) {
    let result = port.save(MEMORY_KEY, &format_number(memory));
    report(MEMORY_KEY, result);
}

/// Persist the theme preference. Failures are logged, never returned.
pub fn save_dark_mode(port: &mut dyn PersistencePort, dark_mode: bool) {
    let result = port.save(DARK_MODE_KEY, if dark_mode { "true" } else { "false" });
    report(DARK_MODE_KEY, result);
}

fn report(key: &str, result: CalcResult<()>) {
    match result {
        Ok(()) => debug!(key, "saved"),
        Err(e) => warn!(key, error = %e, code = e.error_code(), "failed to save; continuing in memory"),
    }
}

/// In-memory port. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a store with existing entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            entries: Arc::new(Mutex::new(map)),
        }
    }

    /// Copy of everything currently stored
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl PersistencePort for MemoryStore {
    fn load(&self, key: &str) -> CalcResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CalcError::internal("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> CalcResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CalcError::internal("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Port whose every operation fails
    pub(crate) struct FailingStore;

    impl PersistencePort for FailingStore {
        fn load(&self, key: &str) -> CalcResult<Option<String>> {
            Err(CalcError::file_error("read", key, "storage unavailable"))
        }

        fn save(&mut self, key: &str, _value: &str) -> CalcResult<()> {
            Err(CalcError::file_error("write", key, "storage unavailable"))
        }
    }

    #[test]
    fn test_empty_store_gives_defaults() {
        let session = PersistedSession::load(&MemoryStore::new());
        assert_eq!(session, PersistedSession::default());
    }

    #[test]
    fn test_load_saved_values() {
        let mut store = MemoryStore::new();
        let history = History::from(vec!["2 + 2 = 4".to_string()]);
        save_history(&mut store, &history);
        save_memory(&mut store, -3.5);
        save_dark_mode(&mut store, true);

        let session = PersistedSession::load(&store);
        assert_eq!(session.history, history);
        assert_eq!(session.memory, -3.5);
        assert!(session.dark_mode);
    }

    #[test]
    fn test_saved_formats() {
        let mut store = MemoryStore::new();
        save_history(&mut store, &History::from(vec!["a".to_string()]));
        save_memory(&mut store, 5.0);
        save_dark_mode(&mut store, false);

        let snapshot = store.snapshot();
        assert_eq!(snapshot[HISTORY_KEY], r#"["a"]"#);
        assert_eq!(snapshot[MEMORY_KEY], "5");
        assert_eq!(snapshot[DARK_MODE_KEY], "false");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryStore::with_entries([
            (HISTORY_KEY, "{broken"),
            (MEMORY_KEY, "lots"),
            (DARK_MODE_KEY, "maybe"),
        ]);
        let session = PersistedSession::load(&store);
        assert!(session.history.is_empty());
        assert_eq!(session.memory, 0.0);
        assert!(!session.dark_mode);
    }

    #[test]
    fn test_failing_port_is_tolerated() {
        let mut store = FailingStore;
        let session = PersistedSession::load(&store);
        assert_eq!(session, PersistedSession::default());

        // Must not panic
        save_history(&mut store, &History::new());
        save_memory(&mut store, 1.0);
        save_dark_mode(&mut store, true);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        save_memory(&mut writer, 7.0);
        assert_eq!(store.load(MEMORY_KEY).unwrap().as_deref(), Some("7"));
    }
}
