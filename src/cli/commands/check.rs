//! Check command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CheckArgs, MonitorConfig};
use crate::monitor::orchestrator::CheckOutcome;
use crate::serving::MonitoringContext;

pub fn run_check(args: CheckArgs, level: LogLevel) -> Result<(), String> {
    let config = MonitorConfig::load(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let context = MonitoringContext::from_config(config).map_err(|e| e.to_string())?;

    let buffered = context.state().lengths();
    if buffered.inputs == 0 {
        log(level, LogLevel::Normal, "No buffered samples; nothing to check");
        context.shutdown();
        return Ok(());
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Checking {} buffered samples for drift...", buffered.inputs),
    );
    let outcome = context.monitor().check_now();
    context.shutdown();

    match outcome {
        CheckOutcome::Completed { data_drift, prediction_drift, reports_saved } => {
            log(level, LogLevel::Normal, &format!("  Data drift: {}", yes_no(data_drift)));
            log(
                level,
                LogLevel::Normal,
                &format!("  Prediction drift: {}", yes_no(prediction_drift)),
            );
            log(
                level,
                LogLevel::Verbose,
                &format!(
                    "  Reports saved: {reports_saved} in {}",
                    context.config().drift.report_dir().display()
                ),
            );
            if args.fail_on_drift && (data_drift || prediction_drift) {
                return Err("Drift detected".to_string());
            }
            Ok(())
        }
        CheckOutcome::Failed(e) => Err(format!("Drift check failed: {e}")),
        CheckOutcome::Skipped => Err("A drift check is already running".to_string()),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
