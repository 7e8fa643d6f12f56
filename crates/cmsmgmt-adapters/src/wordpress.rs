//! WordPress platform adapter.

use std::path::Path;
use std::sync::Arc;

use cmsmgmt_models::{DbConfig, EditOutcome, PlatformTag, UserEdit, UserRecord, VersionInfo};
use cmsmgmt_store::StoreConnector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::patterns::PhpSettings;
use crate::traits::{AdapterInfo, PlatformAdapter};
use crate::users::{NativeUser, UserTable};

/// Marker file at the installation root.
pub const MARKER: &str = "wp-config.php";

/// File holding `$wp_version`.
pub const VERSION_FILE: &str = "wp-includes/version.php";

/// Prefix WordPress uses when `$table_prefix` is not set.
pub const DEFAULT_PREFIX: &str = "wp_";

/// Row of `<prefix>users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WpUserRow {
    #[serde(rename = "ID")]
    id: i64,
    user_login: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    user_email: String,
    #[serde(default)]
    roles: Vec<String>,
}

impl NativeUser for WpUserRow {
    fn username(&self) -> &str {
        &self.user_login
    }

    fn to_record(&self) -> UserRecord {
        UserRecord::new(
            self.id,
            self.user_login.as_str(),
            self.display_name.as_str(),
            self.user_email.as_str(),
        )
        .with_roles(self.roles.iter().cloned())
    }

    fn apply(&mut self, edit: &UserEdit) {
        if let Some(email) = &edit.email {
            self.user_email = email.clone();
        }
        if let Some(name) = &edit.display_name {
            self.display_name = name.clone();
        }
        if let Some(roles) = &edit.roles {
            self.roles = roles.iter().cloned().collect();
        }
    }
}

/// Adapter for WordPress installations.
pub struct WordPressAdapter {
    info: AdapterInfo,
    connector: Arc<dyn StoreConnector>,
}

impl WordPressAdapter {
    /// Creates a WordPress adapter that reaches its database through `connector`.
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            info: AdapterInfo {
                platform: PlatformTag::WordPress,
                name: "WordPress".to_string(),
                marker: MARKER.to_string(),
                description: "WordPress sites configured through wp-config.php".to_string(),
            },
            connector,
        }
    }

    /// Reads database settings from `wp-config.php`.
    fn read_config(&self, root: &Path) -> Result<DbConfig> {
        let path = root.join(MARKER);
        let settings = PhpSettings::load(&path)?;

        let database = settings
            .define("DB_NAME")
            .ok_or_else(|| AdapterError::parse(&path, "DB_NAME is not defined"))?;
        let user = settings.define("DB_USER").unwrap_or_default();
        let host = settings.define("DB_HOST").unwrap_or("localhost");
        let prefix = settings
            .var("table_prefix")
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PREFIX);

        debug!(path = %path.display(), database, prefix, "Read wp-config.php");
        Ok(DbConfig::new(database, user, host, prefix))
    }
}

impl PlatformAdapter for WordPressAdapter {
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
        .list::<WpUserRow>(store.as_ref())
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
        .edit::<WpUserRow>(store.as_mut(), username, edit)
    }

    fn show_info(&self, root: &Path) -> Result<DbConfig> {
        self.read_config(root)
    }

    fn get_version(&self, root: &Path) -> Result<VersionInfo> {
        let path = root.join(VERSION_FILE);
        if !path.is_file() {
            return Err(AdapterError::NotFound {
                what: "version file",
                name: path.display().to_string(),
            });
        }
        PhpSettings::load(&path)?
            .var("wp_version")
            .filter(|v| !v.is_empty())
            .map(VersionInfo::new)
            .ok_or_else(|| AdapterError::parse(&path, "$wp_version is not set"))
    }
}
