//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

use cmsmgmt_models::UserEdit;

use crate::router::Command;

/// Environment variable for the database snapshot directory.
pub const DB_DIR_ENV: &str = "CMSMGMT_DB_DIR";

/// Default snapshot directory name under home.
const DEFAULT_DB_DIR: &str = ".cmsmgmt/db";

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.21 (abc1234, 2026-10-19)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Content Management System Management
#[derive(Parser, Debug)]
#[command(name = "cmsmgmt")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Path to the CMS root directory (default: current directory)
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding database snapshots
    #[arg(long, global = true, env = DB_DIR_ENV)]
    pub db_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// User management commands
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// Show CMS information
    Info {
        #[command(subcommand)]
        command: InfoCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users
    List,

    /// Show user info
    Info,

    /// Edit user details
    Edit {
        /// Login name of the user to edit
        username: String,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// Role or group to assign; repeat to set several. Replaces existing roles.
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum InfoCommand {
    /// Show db information
    Db,

    /// Show CMS version information
    Version,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the snapshot directory, using default if not specified.
    pub fn db_dir(&self) -> PathBuf {
        self.db_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_DB_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_DIR))
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Translates the parsed subcommand into a router command.
    pub fn router_command(&self) -> Command {
        match &self.command {
            Commands::Users { command } => match command {
                UsersCommand::List => Command::ListUsers,
                UsersCommand::Info => Command::UserInfo,
                UsersCommand::Edit {
                    username,
                    email,
                    name,
                    roles,
                } => Command::EditUser {
                    username: username.clone(),
                    edit: UserEdit {
                        email: email.clone(),
                        display_name: name.clone(),
                        roles: (!roles.is_empty())
                            .then(|| roles.iter().cloned().collect::<BTreeSet<_>>()),
                    },
                },
            },
            Commands::Info { command } => match command {
                InfoCommand::Db => Command::DbInfo,
                InfoCommand::Version => Command::Version,
            },
        }
    }
}
