//! Joomla platform adapter.
//!
//! Joomla installations may share one database, each distinguished by a
//! table prefix. The prefix in `configuration.php` is always the first
//! candidate; other prefixes found in the database are reported after it
//! so an operator can see when a database holds more than one site.

use std::path::Path;
use std::sync::Arc;

use cmsmgmt_models::{DbConfig, EditOutcome, PlatformTag, UserEdit, UserRecord, VersionInfo};
use cmsmgmt_store::{StoreConnector, UserStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::patterns::PhpSettings;
use crate::traits::{AdapterInfo, PlatformAdapter};
use crate::users::{NativeUser, UserTable};

/// Marker file at the installation root.
pub const MARKER: &str = "configuration.php";

/// Prefix used when `$dbprefix` is not set.
pub const DEFAULT_PREFIX: &str = "jos_";

/// Version class for Joomla 3.8 and later.
pub const VERSION_FILE: &str = "libraries/src/Version.php";

/// Version class locations for older releases, newest first.
pub const LEGACY_VERSION_FILES: &[&str] = &[
    "libraries/cms/version/version.php",
    "libraries/joomla/version.php",
];

/// Row of `<prefix>users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JoomlaUserRow {
    id: i64,
    username: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    /// Titles of the user groups the account belongs to.
    #[serde(default)]
    groups: Vec<String>,
}

impl NativeUser for JoomlaUserRow {
    fn username(&self) -> &str {
        &self.username
    }

    fn to_record(&self) -> UserRecord {
        UserRecord::new(
            self.id,
            self.username.as_str(),
            self.name.as_str(),
            self.email.as_str(),
        )
        .with_roles(self.groups.iter().cloned())
    }

    fn apply(&mut self, edit: &UserEdit) {
        if let Some(email) = &edit.email {
            self.email = email.clone();
        }
        if let Some(name) = &edit.display_name {
            self.name = name.clone();
        }
        if let Some(roles) = &edit.roles {
            self.groups = roles.iter().cloned().collect();
        }
    }
}

/// Core tables whose names end in `users` without being a site's user table.
const NON_SITE_USER_TABLES: &[&str] = &["action_logs_users"];

/// Prefixes of every Joomla site in a store, sorted.
///
/// Any `<prefix>users` table counts, except core tables such as
/// `jos_action_logs_users` that would yield a bogus `jos_action_logs_`.
pub fn discover_prefixes(store: &dyn UserStore) -> Vec<String> {
    let mut prefixes: Vec<String> = store
        .tables()
        .iter()
        .filter(|t| !NON_SITE_USER_TABLES.iter().any(|n| t.ends_with(*n)))
        .filter_map(|t| t.strip_suffix("users"))
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    prefixes.sort();
    prefixes.dedup();
    prefixes
}

/// Adapter for Joomla installations.
pub struct JoomlaAdapter {
    info: AdapterInfo,
    connector: Arc<dyn StoreConnector>,
}

impl JoomlaAdapter {
    /// Creates a Joomla adapter that reaches its database through `connector`.
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            info: AdapterInfo {
                platform: PlatformTag::Joomla,
                name: "Joomla".to_string(),
                marker: MARKER.to_string(),
                description: "Joomla sites configured through configuration.php".to_string(),
            },
            connector,
        }
    }

    /// Reads database settings from `configuration.php`.
    fn read_config(&self, root: &Path) -> Result<DbConfig> {
        let path = root.join(MARKER);
        let settings = PhpSettings::load(&path)?;

        let database = settings
            .var("db")
            .ok_or_else(|| AdapterError::parse(&path, "$db is not set"))?;
        let user = settings.var("user").unwrap_or_default();
        let host = settings.var("host").unwrap_or("localhost");
        let prefix = settings
            .var("dbprefix")
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PREFIX);

        debug!(path = %path.display(), database, prefix, "Read configuration.php");
        Ok(DbConfig::new(database, user, host, prefix))
    }

    fn read_version(path: &Path) -> Result<VersionInfo> {
        let settings = PhpSettings::load(path)?;

        // Joomla 3.8+: numeric constants on the Version class
        if let (Some(major), Some(minor), Some(patch)) = (
            settings.constant("MAJOR_VERSION"),
            settings.constant("MINOR_VERSION"),
            settings.constant("PATCH_VERSION"),
        ) {
            let mut version = format!("{}.{}.{}", major, minor, patch);
            if let Some(extra) = settings.constant("EXTRA_VERSION").filter(|e| !e.is_empty()) {
                version.push('-');
                version.push_str(extra);
            }
            return Ok(VersionInfo::new(version).with_release(format!("{}.{}", major, minor)));
        }

        // Older releases: `public $RELEASE` and `public $DEV_LEVEL`
        match (settings.var("RELEASE"), settings.var("DEV_LEVEL")) {
            (Some(release), Some(level)) => {
                Ok(VersionInfo::new(format!("{}.{}", release, level)).with_release(release))
            }
            (Some(release), None) => Ok(VersionInfo::new(release).with_release(release)),
            _ => Err(AdapterError::parse(path, "no version constants found")),
        }
    }
}

impl PlatformAdapter for JoomlaAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn list_users(&self, root: &Path) -> Result<Vec<UserRecord>> {
        let config = self.read_config(root)?;
        let store = self
            .connector
            .connect(&config)
            .map_err(|e| AdapterError::from_connect(e, &config.database_name))?;

        UserTable {
            database: &config.database_name,
            prefix: config.default_prefix(),
        }
        .list::<JoomlaUserRow>(store.as_ref())
    }

    fn edit_user(&self, root: &Path, username: &str, edit: &UserEdit) -> Result<EditOutcome> {
        let config = self.read_config(root)?;
        let mut store = self
            .connector
            .connect(&config)
            .map_err(|e| AdapterError::from_connect(e, &config.database_name))?;

        UserTable {
            database: &config.database_name,
            prefix: config.default_prefix(),
        }
        .edit::<JoomlaUserRow>(store.as_mut(), username, edit)
    }

    fn show_info(&self, root: &Path) -> Result<DbConfig> {
        let mut config = self.read_config(root)?;

        match self.connector.connect(&config) {
            Ok(store) => {
                for prefix in discover_prefixes(store.as_ref()) {
                    config.push_candidate(prefix);
                }
            }
            Err(e) => {
                debug!(database = %config.database_name, error = %e, "Skipping prefix discovery");
            }
        }

        Ok(config)
    }

    fn get_version(&self, root: &Path) -> Result<VersionInfo> {
        std::iter::once(VERSION_FILE)
            .chain(LEGACY_VERSION_FILES.iter().copied())
            .map(|rel| root.join(rel))
            .find(|path| path.is_file())
            .ok_or_else(|| AdapterError::NotFound {
                what: "version file",
                name: root.join(VERSION_FILE).display().to_string(),
            })
            .and_then(|path| Self::read_version(&path))
    }
}
