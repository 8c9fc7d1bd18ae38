//! Centinela CLI
//!
//! Operator entry point for a served model's drift monitor.
//!
//! # Usage
//!
//! ```bash
//! # Buffer fill and latest reports
//! centinela status config.yaml
//!
//! # Check the buffered window now and write reports
//! centinela check config.yaml
//!
//! # Validate config
//! centinela validate config.yaml
//! ```

use centinela::cli::{run_command, Cli, LogLevel};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    LogLevel::from_flags(cli.quiet, cli.verbose).init_tracing();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
