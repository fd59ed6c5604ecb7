//! # File Store
//!
//! A [`PersistencePort`] backed by a single JSON file, with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: One calculator session per store file
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "entries": {
//!     "calculatorHistory": "[\"2 + 2 = 4\"]",
//!     "calculatorMemory": "0"
//!   }
//! }
//! ```
//!
//! The lock is an OS-level `fs2` lock on a `.lock` file beside the store
//! (`calci.json.lock`). The OS releases it when the holding process exits,
//! however it exits, so a lock is held exactly while its session is alive.
//! The file's contents only describe the holder for the "locked" message.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::FileStore;
//! use calc_core::persistence::PersistencePort;
//! use std::path::Path;
//!
//! // Acquires the lock and reads existing entries
//! let mut store = FileStore::open(Path::new("calci.json"), "alice")?;
//! store.save("calculatorMemory", "42")?;
//!
//! // Lock is released when dropped
//! drop(store);
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::persistence::PersistencePort;

/// Current schema version for store files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// On-disk layout of a store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Stored values by key
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        StoreDocument {
            version: SCHEMA_VERSION.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

/// Who holds a store, as written into its `.lock` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockHolder {
    pub user_id: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(user_id: String) -> Self {
        LockHolder {
            user_id,
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Exclusive lock on one store file, released on drop.
struct StoreLock {
    file: File,
}

impl StoreLock {
    /// Take the OS lock without waiting.
    ///
    /// Whatever an earlier, no longer running session left in the `.lock`
    /// file is overwritten. A live holder yields `CalcError::FileLocked`.
    fn acquire(path: &Path, user_id: String) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let io_err = |operation: &str, e: io::Error| {
            CalcError::file_error(operation, lock_path.display().to_string(), e.to_string())
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .map_err(|e| io_err("open lock", e))?;

        if file.try_lock_exclusive().is_err() {
            let (locked_by, locked_at) = match read_holder(&mut file) {
                Some(holder) => (
                    format!("{} (pid {})", holder.user_id, holder.pid),
                    holder.locked_at.to_rfc3339(),
                ),
                None => ("another session".to_string(), "unknown".to_string()),
            };
            return Err(CalcError::file_locked(
                path.display().to_string(),
                locked_by,
                locked_at,
            ));
        }

        if let Some(previous) = read_holder(&mut file) {
            info!(holder = %previous.user_id, pid = previous.pid, "taking over lock left by an ended session");
        }

        let holder = serde_json::to_string_pretty(&LockHolder::current(user_id))?;
        file.set_len(0).map_err(|e| io_err("write lock", e))?;
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(holder.as_bytes()))
            .and_then(|_| file.sync_all())
            .map_err(|e| io_err("write lock", e))?;

        Ok(StoreLock { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Left on disk so every opener locks the same inode
        let _ = self.file.set_len(0);
        let _ = FileExt::unlock(&self.file);
    }
}

/// Holder recorded in an open `.lock` file; `None` when empty or unreadable.
fn read_holder(file: &mut File) -> Option<LockHolder> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

/// `<path>.<suffix>`, keeping the store's own extension
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_path(path, "lock")
}

fn tmp_path_for(path: &Path) -> PathBuf {
    sibling_path(path, "tmp")
}

/// Replace the store file atomically: write `<path>.tmp`, fsync, rename.
pub fn save_document(document: &StoreDocument, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(document)?;
    let tmp_path = tmp_path_for(path);

    let written = File::create(&tmp_path).and_then(|mut tmp| {
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        ));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("replace store", path.display().to_string(), e.to_string())
    })
}

/// Load a store document. A missing file is an empty store.
///
/// # Returns
///
/// * `Ok(StoreDocument)` - Loaded (or empty) document
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_document(path: &Path) -> CalcResult<StoreDocument> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreDocument::default()),
        Err(e) => {
            return Err(CalcError::file_error("read", path.display().to_string(), e.to_string()))
        }
    };

    let document: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
        CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    check_version(&document.version)?;
    Ok(document)
}

/// `major.minor` of a version string
fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(str::parse::<u32>);
    let major = parts.next()?.ok()?;
    let minor = parts.next().unwrap_or(Ok(0)).ok()?;
    Some((major, minor))
}

/// A store is readable when its major version matches; on 0.x a newer minor
/// is rejected too.
fn check_version(file_version: &str) -> CalcResult<()> {
    let compatible = match (major_minor(file_version), major_minor(SCHEMA_VERSION)) {
        (Some((file_major, file_minor)), Some((major, minor))) => {
            file_major == major && (major > 0 || file_minor <= minor)
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(CalcError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}

/// File-backed persistence port holding the store's lock for its lifetime.
pub struct FileStore {
    path: PathBuf,
    document: StoreDocument,
    _lock: StoreLock,
}

impl FileStore {
    /// Lock the store file and read its current entries.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CalcError::file_error("create directory", parent.display().to_string(), e.to_string())
            })?;
        }

        let lock = StoreLock::acquire(path, user_id.into())?;
        let document = load_document(path)?;
        info!(path = %path.display(), entries = document.entries.len(), "opened store");

        Ok(FileStore {
            path: path.to_path_buf(),
            document,
            _lock: lock,
        })
    }
}

impl PersistencePort for FileStore {
    fn load(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.document.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> CalcResult<()> {
        let previous = self.document.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = save_document(&self.document, &self.path) {
            // Keep memory in step with disk
            match previous {
                Some(old) => self.document.entries.insert(key.to_string(), old),
                None => self.document.entries.remove(key),
            };
            return Err(e);
        }
        debug!(key, path = %self.path.display(), "store written");
        Ok(())
    }
}
