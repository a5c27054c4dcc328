use std::fs;
use std::path::{Path, PathBuf};

use domaindeck_common::{Error, Result};

/// Read one migration script into memory.
pub fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Script(format!("failed to read {}: {e}", path.display())))
}

/// Resolve `path` to the ordered list of scripts to run.
///
/// A file is returned as-is. A directory yields its `.sql` entries sorted
/// by file name, which runs timestamp-prefixed migrations in order.
pub fn collect_sql_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(Error::Script(format!(
            "no such file or directory: {}",
            path.display()
        )));
    }

    let entries = fs::read_dir(path)
        .map_err(|e| Error::Script(format!("failed to read directory {}: {e}", path.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| Error::Script(format!("failed to read directory entry: {e}")))?;
        let entry_path = entry.path();
        if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "sql") {
            files.push(entry_path);
        }
    }

    if files.is_empty() {
        return Err(Error::Script(format!(
            "no .sql files in {}",
            path.display()
        )));
    }

    files.sort();
    Ok(files)
}
