//! cmsmgmt CLI entry point.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use cmsmgmt_cli::cli::Cli;
use cmsmgmt_cli::commands;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::execute(&cli) {
        let platform = e.platform().map(|p| p.id()).unwrap_or("none");
        error!(platform, command = %cli.router_command(), "{}", e);
        println!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
