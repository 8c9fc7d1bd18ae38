//! CLI module for centinela
//!
//! Operator commands over a model's drift buffers and reports.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
