//! Rendering of command results.

use cmsmgmt_models::{EditOutcome, UserRecord};

use crate::cli::OutputFormat;
use crate::router::CommandResult;

/// Renders a result in the requested format.
pub fn render(result: &CommandResult, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result),
    }
}

fn roles(user: &UserRecord) -> String {
    let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
    format!("[{}]", roles.join(", "))
}

/// One line per user.
pub fn user_line(user: &UserRecord) -> String {
    format!(
        "ID:{}  Username:{}  Name:{}  Email:{}  Roles:{}",
        user.id,
        user.username,
        user.display_name,
        user.email,
        roles(user)
    )
}

fn render_table(result: &CommandResult) -> String {
    let mut lines = Vec::new();

    match result {
        CommandResult::Users { platform, users } => {
            if users.is_empty() {
                lines.push(format!("No {} users found.", platform));
            } else {
                lines.push(format!("{} users:", platform));
                lines.extend(users.iter().map(user_line));
                lines.push(format!("\n{} user(s)", users.len()));
            }
        }
        CommandResult::Edited { platform, outcome } => match outcome {
            EditOutcome::Updated { user, fields } => {
                lines.push(format!(
                    "Updated {} user '{}' ({})",
                    platform,
                    user.username,
                    fields.join(", ")
                ));
                lines.push(user_line(user));
            }
            EditOutcome::Unchanged { user } => {
                lines.push(format!(
                    "No changes requested for {} user '{}'",
                    platform, user.username
                ));
                lines.push(user_line(user));
            }
        },
        CommandResult::DbInfo { platform, db } => {
            lines.push(format!("{} DB Name: {}", platform, db.database_name));
            lines.push(format!("{} DB User: {}", platform, db.user));
            if !db.host.is_empty() {
                lines.push(format!("{} DB Host: {}", platform, db.host));
            }
            lines.push(format!(
                "Identified {} table prefixes: [{}]",
                platform,
                db.table_prefix_candidates.join(", ")
            ));
            if db.is_ambiguous() {
                lines.push(format!("Default prefix: {}", db.default_prefix()));
            }
        }
        CommandResult::Version { platform, version } => {
            lines.push(format!("{} Version: {}", platform, version.version));
            if version.has_release() {
                lines.push(format!("Release: {}", version.release));
            }
        }
        CommandResult::NotImplemented { message, .. } => lines.push(message.clone()),
    }

    lines.join("\n")
}
