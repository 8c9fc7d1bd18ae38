//! Status command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{MonitorConfig, OutputFormat, StatusArgs};
use crate::serving::{MonitorStatus, MonitoringContext};

pub fn format_status(status: &MonitorStatus) -> String {
    let mut lines = vec![
        format!("Model: {}", status.model),
        format!(
            "  Buffered: {}/{} inputs, {}/{} predictions",
            status.buffered_inputs,
            status.buffer_size,
            status.buffered_predictions,
            status.buffer_size
        ),
    ];
    for report in &status.reports {
        let line = match (report.drift_detected, report.generated_at) {
            (Some(drift), Some(at)) => format!(
                "  {} report: {} ({})",
                report.stream,
                if drift { "DRIFT" } else { "no drift" },
                at.to_rfc3339()
            ),
            _ => format!("  {} report: not yet available", report.stream),
        };
        lines.push(line);
    }
    lines.join("\n")
}

pub fn run_status(args: StatusArgs, level: LogLevel) -> Result<(), String> {
    let config = MonitorConfig::load(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let context = MonitoringContext::from_config(config).map_err(|e| e.to_string())?;
    let status = context.status().map_err(|e| e.to_string())?;
    context.shutdown();

    match args.format {
        OutputFormat::Text => log(level, LogLevel::Normal, &format_status(&status)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&status)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}
