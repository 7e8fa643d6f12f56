//! Database and version information.

use serde::{Deserialize, Serialize};

/// Normalized database settings of an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub database_name: String,
    pub user: String,
    #[serde(default)]
    pub host: String,
    /// Table prefixes, best guess first. Never empty.
    pub table_prefix_candidates: Vec<String>,
}

impl DbConfig {
    /// Creates a config whose only prefix candidate is `prefix`.
    pub fn new(
        database_name: impl Into<String>,
        user: impl Into<String>,
        host: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            user: user.into(),
            host: host.into(),
            table_prefix_candidates: vec![prefix.into()],
        }
    }

    /// The prefix used for queries.
    pub fn default_prefix(&self) -> &str {
        self.table_prefix_candidates
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Appends a candidate unless it is already present.
    pub fn push_candidate(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.table_prefix_candidates.contains(&prefix) {
            self.table_prefix_candidates.push(prefix);
        }
    }

    /// True when more than one prefix could be in use.
    pub fn is_ambiguous(&self) -> bool {
        self.table_prefix_candidates.len() > 1
    }
}

/// Installed version of a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    /// Release line, empty for platforms without one.
    #[serde(default)]
    pub release: String,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release: String::new(),
        }
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    pub fn has_release(&self) -> bool {
        !self.release.is_empty()
    }
}
