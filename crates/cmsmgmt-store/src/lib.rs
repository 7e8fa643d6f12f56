//! User store layer for cmsmgmt.
//!
//! Platform adapters never talk to a database directly. They ask a
//! [`StoreConnector`] for a [`UserStore`] matching the installation's
//! database settings and read or rewrite whole tables through it.
//!
//! The shipped backend is [`SnapshotStore`]: one JSON document per
//! database, rewritten with atomic file operations (write to temp file,
//! then rename) so an interrupted edit never leaves a half-written table.
//!
//! # Example
//!
//! ```no_run
//! use cmsmgmt_models::DbConfig;
//! use cmsmgmt_store::{SnapshotConnector, StoreConnector};
//!
//! let connector = SnapshotConnector::new("/var/lib/cmsmgmt/db");
//! let db = DbConfig::new("joomla_db", "joomla_user", "localhost", "jos_");
//!
//! let store = connector.connect(&db).unwrap();
//! for table in store.tables() {
//!     println!("{}", table);
//! }
//! ```

pub mod atomic;
pub mod error;
pub mod snapshot;

pub use error::{Result, StoreError};
pub use snapshot::{Snapshot, SnapshotConnector, SnapshotStore};

use cmsmgmt_models::DbConfig;
use serde_json::Value;

/// Table-level access to a CMS database.
pub trait UserStore {
    /// Names of all tables, sorted.
    fn tables(&self) -> Vec<String>;

    /// Returns every row of a table.
    fn rows(&self, table: &str) -> Result<Vec<Value>>;

    /// Replaces every row of an existing table.
    ///
    /// Either all rows are replaced or the store is left as it was.
    fn replace_rows(&mut self, table: &str, rows: Vec<Value>) -> Result<()>;

    /// Checks whether a table exists.
    fn has_table(&self, table: &str) -> bool {
        self.tables().iter().any(|t| t == table)
    }
}

/// Opens a store for an installation's database settings.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, db: &DbConfig) -> Result<Box<dyn UserStore>>;
}
