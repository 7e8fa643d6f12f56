//! Core data models for cmsmgmt.
//!
//! Every platform adapter translates its native records into the types in
//! this crate, so the router and the CLI only ever see one shape per
//! concept regardless of which CMS is installed.

pub mod info;
pub mod platform;
pub mod user;

pub use info::{DbConfig, VersionInfo};
pub use platform::PlatformTag;
pub use user::{EditOutcome, UserEdit, UserRecord};
