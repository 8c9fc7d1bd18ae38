//! CLI command implementations

mod check;
mod status;
mod validate;

#[cfg(test)]
mod tests;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Status(args) => status::run_status(args, log_level),
        Command::Check(args) => check::run_check(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}
