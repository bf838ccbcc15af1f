//! CLI module for geomodel
//!
//! Provides the command-line interface:
//! - validate: parse + validate, print diagnostics and display labels
//! - plan: print the generated DDL script
//! - apply: apply the model to the in-memory backend

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{apply_command, plan_command, run_command, validate_command};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
