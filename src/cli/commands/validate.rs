//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, validate_config, MonitorConfig, ValidateArgs};

/// Format the configuration as an indented summary
pub fn format_config_summary(config: &MonitorConfig) -> String {
    let drift = &config.drift;
    let mut lines = vec![
        format!("  Model: {}", config.model.name),
        format!("  Buffer path: {}", drift.path.display()),
        format!("  Buffer size: {}", drift.buffer_size),
        format!("  Reference data: {}", drift.reference_path.display()),
        format!("  Report path: {}", drift.report_dir().display()),
    ];
    lines.push(format!("  Evaluation timeout: {}s", drift.evaluation_timeout_secs));
    lines.push(format!("  Save retries: {}", drift.save_retries));
    lines.join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    validate_config(&config).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");
    log(level, LogLevel::Verbose, &format_config_summary(&config));
    Ok(())
}
