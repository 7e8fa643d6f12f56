//! cmsmgmt CLI library.
//!
//! This crate provides the command-line interface, the command router and
//! result rendering for cmsmgmt.

pub mod cli;
pub mod commands;
pub mod output;
pub mod router;

use std::path::{Path, PathBuf};

use router::RouterError;

/// Resolves the installation root for this invocation.
///
/// An explicit path must exist. Without one the current directory is used.
pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf, RouterError> {
    match path {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => Err(RouterError::PathNotFound(path.to_path_buf())),
        None => std::env::current_dir().map_err(|_| RouterError::PathNotFound(PathBuf::from("."))),
    }
}
