//! History export to a plain text file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use calc_core::History;
use tracing::info;

/// Write the history, one entry per line, to `path`.
///
/// Missing parent directories are created; an existing file is replaced.
pub fn export_history(history: &History, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    }

    fs::write(path, history.export_text())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), entries = history.len(), "history exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_export_writes_lines() {
        let dir = temp_dir().join(format!("calci_export_{}", std::process::id()));
        let history = History::from(vec!["2 + 2 = 4".to_string(), "4! = 24".to_string()]);

        let path = dir.join("calculator_history.txt");
        export_history(&history, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2 + 2 = 4\n4! = 24");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_export_into_a_file_path_fails() {
        let blocker = temp_dir().join(format!("calci_export_blocker_{}", std::process::id()));
        fs::write(&blocker, "not a directory").unwrap();

        let result = export_history(&History::new(), &blocker.join("out.txt"));
        assert!(result.is_err());
        let _ = fs::remove_file(blocker);
    }
}
