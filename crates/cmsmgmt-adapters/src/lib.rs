//! Platform adapters for cmsmgmt.
//!
//! This crate provides a unified interface for administering different
//! content-management systems (WordPress, Joomla) through the
//! `PlatformAdapter` trait.
//!
//! # Key Concepts
//!
//! - **PlatformAdapter**: Trait that all platform adapters implement
//! - **AdapterRegistry**: Holds the adapters in detection priority order
//! - **Detector**: Picks the adapter whose marker file is present
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use cmsmgmt_adapters::{AdapterRegistry, Detector};
//! use cmsmgmt_store::SnapshotConnector;
//!
//! let registry = AdapterRegistry::new(Arc::new(SnapshotConnector::new("/var/lib/cmsmgmt/db")));
//! let root = Path::new("/var/www/html");
//!
//! if let Some(adapter) = Detector::new(&registry).select(root) {
//!     let version = adapter.get_version(root).unwrap();
//!     println!("{} {}", adapter.info().name, version.version);
//! }
//! ```

pub mod detector;
pub mod error;
pub mod joomla;
pub mod patterns;
pub mod registry;
pub mod traits;
mod users;
pub mod wordpress;

pub use detector::{Detection, Detector};
pub use error::{AdapterError, ErrorKind, Result};
pub use joomla::JoomlaAdapter;
pub use patterns::PhpSettings;
pub use registry::AdapterRegistry;
pub use traits::{AdapterInfo, PlatformAdapter};
pub use wordpress::WordPressAdapter;
