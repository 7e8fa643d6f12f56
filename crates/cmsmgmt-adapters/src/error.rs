//! Error types for adapter operations.

use std::fmt;
use std::path::PathBuf;

use cmsmgmt_store::StoreError;
use thiserror::Error;

/// Broad category of an adapter failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Parse,
    Schema,
    NotFound,
    Write,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Parse => "parse",
            ErrorKind::Schema => "schema",
            ErrorKind::NotFound => "not found",
            ErrorKind::Write => "write",
        };
        f.write_str(name)
    }
}

/// Errors that platform adapters report.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The backing store could not be reached.
    #[error("cannot connect to database '{database}': {reason}")]
    Connection { database: String, reason: String },

    /// A config or content file could not be interpreted.
    #[error("cannot parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// The store was reached but the expected structure is missing.
    #[error("table '{table}' {reason}")]
    Schema {
        table: String,
        prefix: String,
        reason: String,
    },

    /// A requested entity does not exist.
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    /// An edit could not be committed.
    #[error("cannot write table '{table}': {reason}")]
    Write { table: String, reason: String },
}

impl AdapterError {
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AdapterError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn connection(database: impl Into<String>, err: impl fmt::Display) -> Self {
        AdapterError::Connection {
            database: database.into(),
            reason: err.to_string(),
        }
    }

    pub fn missing_table(table: impl Into<String>, prefix: impl Into<String>) -> Self {
        AdapterError::Schema {
            table: table.into(),
            prefix: prefix.into(),
            reason: "does not exist".to_string(),
        }
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        AdapterError::NotFound {
            what: "user",
            name: username.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Connection { .. } => ErrorKind::Connection,
            AdapterError::Parse { .. } => ErrorKind::Parse,
            AdapterError::Schema { .. } => ErrorKind::Schema,
            AdapterError::NotFound { .. } => ErrorKind::NotFound,
            AdapterError::Write { .. } => ErrorKind::Write,
        }
    }

    /// Where the failure happened, when the error knows more than its message.
    pub fn context(&self) -> Option<String> {
        match self {
            AdapterError::Connection { database, .. } => Some(format!("database '{}'", database)),
            AdapterError::Schema { prefix, .. } => Some(format!("table prefix '{}'", prefix)),
            AdapterError::Write { table, .. } => Some(format!("table '{}'", table)),
            AdapterError::Parse { .. } | AdapterError::NotFound { .. } => None,
        }
    }

    /// Classifies a failure to open the store for `database`.
    pub(crate) fn from_connect(err: StoreError, database: &str) -> Self {
        match err {
            StoreError::Malformed { path, source } => AdapterError::parse(path, source.to_string()),
            other => AdapterError::connection(database, other),
        }
    }

    /// Classifies a store failure raised while reading `table`.
    pub(crate) fn from_store_read(
        err: StoreError,
        database: &str,
        table: &str,
        prefix: &str,
    ) -> Self {
        match err {
            StoreError::TableNotFound(_) => AdapterError::missing_table(table, prefix),
            other => Self::from_connect(other, database),
        }
    }

    /// Classifies a store failure raised while committing `table`.
    pub(crate) fn from_store_write(err: StoreError, table: &str) -> Self {
        AdapterError::Write {
            table: table.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AdapterError::user_not_found("bob").kind(), ErrorKind::NotFound);
        assert_eq!(
            AdapterError::missing_table("jos_users", "jos_").kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            AdapterError::parse("/srv/wp-config.php", "no DB_NAME").kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn test_schema_context_names_prefix() {
        let err = AdapterError::missing_table("j3_users", "j3_");
        assert_eq!(err.context().as_deref(), Some("table prefix 'j3_'"));
        assert_eq!(err.to_string(), "table 'j3_users' does not exist");
    }

    #[test]
    fn test_store_read_mapping() {
        let err = AdapterError::from_store_read(
            StoreError::TableNotFound("wp_users".to_string()),
            "wordpress",
            "wp_users",
            "wp_",
        );
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = AdapterError::from_store_read(
            StoreError::Unavailable {
                path: PathBuf::from("/db/wordpress.json"),
                reason: "no database snapshot found".to_string(),
            },
            "wordpress",
            "wp_users",
            "wp_",
        );
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.to_string().contains("wordpress"));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            AdapterError::user_not_found("ghost").to_string(),
            "user not found: ghost"
        );
    }
}
