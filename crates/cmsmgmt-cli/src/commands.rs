//! Command handlers for CLI subcommands.

use std::path::Path;
use std::sync::Arc;

use cmsmgmt_adapters::AdapterRegistry;
use cmsmgmt_store::SnapshotConnector;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::output::render;
use crate::resolve_root;
use crate::router::{Command, Result, Router};

/// Builds the router used by the binary.
pub fn default_router(db_dir: &Path) -> Router {
    debug!(db_dir = %db_dir.display(), "Using database snapshot directory");
    let connector = Arc::new(SnapshotConnector::new(db_dir));
    Router::new(AdapterRegistry::new(connector))
}

/// Runs one command and returns its rendered output.
pub fn run(
    router: &Router,
    root: &Path,
    command: &Command,
    format: OutputFormat,
) -> Result<String> {
    let result = router.dispatch(root, command)?;
    Ok(render(&result, format)?)
}

/// Execute the parsed CLI invocation, printing the result.
pub fn execute(cli: &Cli) -> Result<()> {
    let root = resolve_root(cli.path.as_deref())?;
    let router = default_router(&cli.db_dir());

    let output = run(&router, &root, &cli.router_command(), cli.format)?;
    println!("{}", output);
    Ok(())
}
