//! Command routing.
//!
//! The router is the only place that knows which platform governs a root.
//! It runs detection once, keeps the chosen adapter for the rest of the
//! invocation and turns every adapter call into exactly one
//! [`CommandResult`] or one [`RouterError`].

use std::fmt;
use std::path::{Path, PathBuf};

use cmsmgmt_adapters::{AdapterError, AdapterRegistry, Detector, PlatformAdapter};
use cmsmgmt_models::{DbConfig, EditOutcome, PlatformTag, UserEdit, UserRecord, VersionInfo};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Message returned by `users info`.
pub const USER_INFO_NOT_IMPLEMENTED: &str = "User info functionality not implemented yet.";

/// A user-facing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `users list`
    ListUsers,
    /// `users info`
    UserInfo,
    /// `users edit <name>`
    EditUser { username: String, edit: UserEdit },
    /// `info db`
    DbInfo,
    /// `info version`
    Version,
}

impl Command {
    /// The command as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListUsers => "users list",
            Command::UserInfo => "users info",
            Command::EditUser { .. } => "users edit",
            Command::DbInfo => "info db",
            Command::Version => "info version",
        }
    }

    /// Whether the command needs a detected platform.
    pub fn requires_platform(&self) -> bool {
        !matches!(self, Command::UserInfo)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandResult {
    Users {
        platform: PlatformTag,
        users: Vec<UserRecord>,
    },
    Edited {
        platform: PlatformTag,
        outcome: EditOutcome,
    },
    DbInfo {
        platform: PlatformTag,
        db: DbConfig,
    },
    Version {
        platform: PlatformTag,
        version: VersionInfo,
    },
    /// The command exists but does nothing yet. Not a failure.
    NotImplemented { command: String, message: String },
}

fn context_suffix(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

/// Errors that end an invocation.
#[derive(Error, Debug)]
pub enum RouterError {
    /// The root path given with `--path` does not exist.
    #[error("the specified CMS path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// No adapter recognized the root path.
    #[error(
        "unable to detect CMS type at {}. Make sure you're in the correct directory or specify the correct path using the -p/--path flag",
        .0.display()
    )]
    PlatformUndetected(PathBuf),

    /// A command argument was rejected before dispatch.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The platform adapter failed.
    #[error("{platform} `{command}` failed{}: {source}", context_suffix(.context))]
    Adapter {
        platform: PlatformTag,
        command: &'static str,
        context: Option<String>,
        #[source]
        source: AdapterError,
    },

    /// A result could not be rendered.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl RouterError {
    /// Process exit status for this error. Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            RouterError::Adapter { .. } | RouterError::Output(_) => 1,
            RouterError::PathNotFound(_) | RouterError::InvalidArgument(_) => 2,
            RouterError::PlatformUndetected(_) => 3,
        }
    }

    /// Platform the error is attributed to, if detection got that far.
    pub fn platform(&self) -> Option<PlatformTag> {
        match self {
            RouterError::Adapter { platform, .. } => Some(*platform),
            _ => None,
        }
    }
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Routes commands to the adapter governing a root path.
pub struct Router {
    registry: AdapterRegistry,
}

impl Router {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Runs detection for `root`, failing when no platform matches.
    pub fn select(&self, root: &Path) -> Result<std::sync::Arc<dyn PlatformAdapter>> {
        let detection = Detector::new(&self.registry).inspect(root);

        if detection.is_ambiguous() {
            let names: Vec<&str> = detection.matched.iter().map(|p| p.display_name()).collect();
            warn!(
                root = %root.display(),
                matched = ?names,
                chosen = %detection.platform(),
                "Markers for several platforms found; using the highest priority one"
            );
        }

        detection
            .adapter
            .ok_or_else(|| RouterError::PlatformUndetected(root.to_path_buf()))
    }

    fn not_implemented(command: &Command) -> CommandResult {
        CommandResult::NotImplemented {
            command: command.name().to_string(),
            message: USER_INFO_NOT_IMPLEMENTED.to_string(),
        }
    }

    /// Executes one command against `root`.
    pub fn dispatch(&self, root: &Path, command: &Command) -> Result<CommandResult> {
        if !command.requires_platform() {
            return Ok(Self::not_implemented(command));
        }

        if let Command::EditUser { username, .. } = command {
            if username.is_empty() {
                return Err(RouterError::InvalidArgument(
                    "username must not be empty".to_string(),
                ));
            }
        }

        let adapter = self.select(root)?;
        let platform = adapter.platform();
        info!(
            platform = %platform,
            command = %command,
            root = %root.display(),
            "Dispatching command"
        );

        let annotate = |source: AdapterError| RouterError::Adapter {
            platform,
            command: command.name(),
            context: source.context(),
            source,
        };

        let result = match command {
            Command::ListUsers => CommandResult::Users {
                platform,
                users: adapter.list_users(root).map_err(annotate)?,
            },
            Command::EditUser { username, edit } => CommandResult::Edited {
                platform,
                outcome: adapter.edit_user(root, username, edit).map_err(annotate)?,
            },
            Command::DbInfo => CommandResult::DbInfo {
                platform,
                db: adapter.show_info(root).map_err(annotate)?,
            },
            Command::Version => CommandResult::Version {
                platform,
                version: adapter.get_version(root).map_err(annotate)?,
            },
            Command::UserInfo => Self::not_implemented(command),
        };

        Ok(result)
    }
}
