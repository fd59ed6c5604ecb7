//! # History Log
//!
//! Append-only audit trail of completed operations. Entries are immutable
//! text lines; the log only grows or is cleared wholesale.
//!
//! Persisted as a JSON array of strings. Export is plain text, one entry per
//! line.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::history::History;
//!
//! let mut history = History::new();
//! history.push("2 + 3 = 5");
//! history.push("√(9) = 3");
//!
//! assert_eq!(history.export_text(), "2 + 3 = 5\n√(9) = 3");
//! assert_eq!(history.to_json().unwrap(), r#"["2 + 3 = 5","√(9) = 3"]"#);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// Ordered, append-only log of history lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<String>);

impl History {
    pub fn new() -> Self {
        History(Vec::new())
    }

    /// Append one entry at the end.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent entry, if any
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Serialize as a JSON array of strings.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Parse a JSON array of strings.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let entries: Vec<String> = serde_json::from_str(json)?;
        Ok(History(entries))
    }

    /// Newline-joined text for export.
    pub fn export_text(&self) -> String {
        self.0.join("\n")
    }
}

impl From<Vec<String>> for History {
    fn from(entries: Vec<String>) -> Self {
        History(entries)
    }
}
