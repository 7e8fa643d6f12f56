//! Snapshot-backed user store.
//!
//! Each database is one JSON document named after the database:
//!
//! ```text
//! <db_dir>/
//! ├── wordpress.json   # {"tables": {"wp_users": [ {...}, ... ]}}
//! └── joomla_db.json   # {"tables": {"jos_users": [ ... ], "j3_users": [ ... ]}}
//! ```
//!
//! Rows are kept as raw JSON values; the platform adapters own their
//! layout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cmsmgmt_models::DbConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::atomic::{atomic_write_json, read_json};
use crate::error::{Result, StoreError};
use crate::{StoreConnector, UserStore};

/// On-disk layout of one database snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Value>>,
}

/// A store backed by a single snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl SnapshotStore {
    /// Opens an existing snapshot file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(StoreError::Unavailable {
                reason: "no database snapshot found".to_string(),
                path,
            });
        }
        let snapshot: Snapshot = read_json(&path)?;
        debug!(path = %path.display(), tables = snapshot.tables.len(), "Opened snapshot");
        Ok(Self { path, snapshot })
    }

    /// Creates a store file with the given contents, replacing any existing one.
    pub fn create(path: impl Into<PathBuf>, snapshot: Snapshot) -> Result<Self> {
        let path = path.into();
        atomic_write_json(&path, &snapshot)?;
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserStore for SnapshotStore {
    fn tables(&self) -> Vec<String> {
        self.snapshot.tables.keys().cloned().collect()
    }

    fn rows(&self, table: &str) -> Result<Vec<Value>> {
        self.snapshot
            .tables
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn replace_rows(&mut self, table: &str, rows: Vec<Value>) -> Result<()> {
        if !self.snapshot.tables.contains_key(table) {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let mut next = self.snapshot.clone();
        next.tables.insert(table.to_string(), rows);
        atomic_write_json(&self.path, &next)?;

        // Only adopt the new state once it is on disk
        self.snapshot = next;
        debug!(path = %self.path.display(), table, "Replaced table rows");
        Ok(())
    }
}

/// Opens `<dir>/<database_name>.json` for a database config.
#[derive(Debug, Clone)]
pub struct SnapshotConnector {
    dir: PathBuf,
}

impl SnapshotConnector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for a database name.
    pub fn snapshot_path(&self, database_name: &str) -> Result<PathBuf> {
        let valid = !database_name.is_empty()
            && database_name != "."
            && database_name != ".."
            && !database_name.contains(['/', '\\']);
        if !valid {
            return Err(StoreError::Unavailable {
                path: self.dir.clone(),
                reason: format!("invalid database name '{}'", database_name),
            });
        }
        Ok(self.dir.join(format!("{}.json", database_name)))
    }
}

impl StoreConnector for SnapshotConnector {
    fn connect(&self, db: &DbConfig) -> Result<Box<dyn UserStore>> {
        let path = self.snapshot_path(&db.database_name)?;
        Ok(Box::new(SnapshotStore::open(path)?))
    }
}
