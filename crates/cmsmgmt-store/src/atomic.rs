//! Atomic file operations.
//!
//! A database snapshot is either the old bytes or the new bytes on disk,
//! never a mix of the two.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Writes data to a file atomically.
///
/// Data goes to a temporary file in the target's directory which is then
/// renamed over the target. If any step fails the target is untouched.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StoreError::DirectoryError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Same directory so the rename never crosses filesystems
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file =
        tempfile::NamedTempFile::new_in(dir).map_err(|source| StoreError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .write_all(data)
        .and_then(|_| temp_file.flush())
        .map_err(|source| StoreError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|source| StoreError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .persist(path)
        .map_err(|e| StoreError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Writes JSON data to a file atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Reads and deserializes JSON from a file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| StoreError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        name: String,
        value: i32,
    }

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        atomic_write(&path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // No stray temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/db/site.json");

        atomic_write(&path, b"{}").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_read_json_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Row> = read_json(&path);
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_read_json_missing() {
        let dir = tempdir().unwrap();
        let result: Result<Row> = read_json(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::ReadError { .. })));
    }

    #[test]
    fn test_write_then_read_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("row.json");
        let row = Row {
            name: "admin".to_string(),
            value: 1,
        };

        atomic_write_json(&path, &row).unwrap();
        let loaded: Row = read_json(&path).unwrap();

        assert_eq!(loaded, row);
    }
}
