//! Core traits for platform adapters.
//!
//! The `PlatformAdapter` trait is the one contract every supported CMS
//! implements. The router holds a single `Arc<dyn PlatformAdapter>` chosen
//! by detection and never branches on the platform again.

use std::path::Path;

use cmsmgmt_models::{DbConfig, EditOutcome, PlatformTag, UserEdit, UserRecord, VersionInfo};

use crate::error::Result;

/// Static information about an adapter.
#[derive(Debug, Clone)]
pub struct AdapterInfo {
    /// Platform this adapter serves.
    pub platform: PlatformTag,
    /// Human-readable name.
    pub name: String,
    /// Marker file, relative to the installation root.
    pub marker: String,
    /// Description of the adapter.
    pub description: String,
}

/// Trait for platform adapters.
///
/// Every operation receives the installation root, which the caller has
/// already checked exists. Only `edit_user` may change external state and
/// it must either apply the whole edit or nothing.
///
/// # Example
///
/// ```ignore
/// use cmsmgmt_adapters::PlatformAdapter;
///
/// fn print_users(adapter: &dyn PlatformAdapter, root: &std::path::Path) {
///     match adapter.list_users(root) {
///         Ok(users) => users.iter().for_each(|u| println!("{}", u.username)),
///         Err(e) => eprintln!("{} ({})", e, e.kind()),
///     }
/// }
/// ```
pub trait PlatformAdapter: Send + Sync {
    /// Returns information about this adapter.
    fn info(&self) -> &AdapterInfo;

    /// Checks whether `root` holds this platform's marker file.
    ///
    /// A single filesystem check; never fails.
    fn detect(&self, root: &Path) -> bool {
        root.join(&self.info().marker).is_file()
    }

    /// Lists users in the platform's native order.
    fn list_users(&self, root: &Path) -> Result<Vec<UserRecord>>;

    /// Applies `edit` to the user named `username`.
    fn edit_user(&self, root: &Path, username: &str, edit: &UserEdit) -> Result<EditOutcome>;

    /// Reads database settings, best prefix candidate first.
    fn show_info(&self, root: &Path) -> Result<DbConfig>;

    /// Reads the installed version.
    fn get_version(&self, root: &Path) -> Result<VersionInfo>;

    /// Shorthand for `info().platform`.
    fn platform(&self) -> PlatformTag {
        self.info().platform
    }
}
