//! Settings file handling.
//!
//! Settings are a JSON document; every field is optional and missing fields
//! take their defaults. Command line flags are applied on top by `main`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::keypad::KeypadKind;

/// Directory name used under the platform config/data dirs
const APP_DIR: &str = "calci";

/// Default export file name
pub const EXPORT_FILE_NAME: &str = "calculator_history.txt";

/// Default last-pressed highlight duration
pub const HIGHLIGHT_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding history, memory and theme
    pub store_path: PathBuf,
    /// Directory history exports are written to
    pub export_dir: PathBuf,
    pub export_file_name: String,
    /// How long a pressed button stays highlighted
    pub highlight_ms: u64,
    /// Keypad shown at startup
    pub initial_keypad: KeypadKind,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Settings {
            store_path: data_dir.join("store.json"),
            export_dir,
            export_file_name: EXPORT_FILE_NAME.to_string(),
            highlight_ms: HIGHLIGHT_MS,
            initial_keypad: KeypadKind::Basic,
            log_file: data_dir.join("calci.log"),
        }
    }
}

impl Settings {
    /// Full path of the history export file
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}

/// `<config dir>/calci/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// Load settings from `path`, or the default location when `None`.
///
/// Never fails: a missing file gives defaults, an unreadable or malformed
/// file gives defaults plus a warning for the caller to report once logging
/// is up.
pub fn load(path: Option<&Path>) -> (Settings, Option<String>) {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return (Settings::default(), None),
    };

    if !path.exists() {
        return (Settings::default(), None);
    }

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            return (
                Settings::default(),
                Some(format!("Cannot read config {}: {}", path.display(), e)),
            )
        }
    };

    match serde_json::from_str(&contents) {
        Ok(settings) => (settings, None),
        Err(e) => (
            Settings::default(),
            Some(format!("Ignoring malformed config {}: {}", path.display(), e)),
        ),
    }
}
