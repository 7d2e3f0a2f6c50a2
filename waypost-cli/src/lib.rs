//! Command-line interface for the Waypost map client.
//!
//! Every subcommand drives one [`waypost_core::MapSession`] wired to the
//! HTTP adapters in `waypost-data` and prints its outcome as pretty JSON on
//! stdout. Logs go to stderr and follow `RUST_LOG`.
#![forbid(unsafe_code)]

mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;

use commands::{Command, execute, write_report};
use config::ServiceArgs;

pub use error::CliError;

/// Run the Waypost CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init()?;
    let config = cli.service.into_config()?;
    let session = config.build_session()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(execute(&session, cli.command))?;
    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, &report)
}

#[derive(Debug, Parser)]
#[command(
    name = "waypost",
    about = "Browse, search and route to points of interest",
    version
)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,
    #[command(subcommand)]
    command: Command,
}

#[cfg(test)]
mod tests;
