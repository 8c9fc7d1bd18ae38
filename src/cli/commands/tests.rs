//! CLI command tests

use super::*;
use crate::cli::LogLevel;
use crate::config::*;
use crate::monitor::report::{DriftReportStore, FsReportStore, ReportStream};
use crate::monitor::sample::{FeatureRow, Score};
use crate::monitor::state::DriftState;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a minimal valid config file for testing
fn create_test_config(dir: &TempDir, buffer_size: usize) -> PathBuf {
    let config_path = dir.path().join("config.yaml");
    let reference_path = dir.path().join("train_data.csv");

    let mut reference = String::from("mean_radius,target,pred,proba\n");
    for i in 0..30 {
        reference.push_str(&format!("{}.5,0,0,0.{:02}\n", 10 + i, 10 + i));
    }
    std::fs::write(&reference_path, reference).unwrap();

    let config = format!(
        r#"
model:
  name: logistic_regression

drift:
  path: {}
  report_path: {}
  buffer_size: {buffer_size}
  reference_path: {}
"#,
        dir.path().join(".drift").display(),
        dir.path().join("reports").display(),
        reference_path.display()
    );

    std::fs::write(&config_path, config).unwrap();
    config_path
}

fn buffer_samples(dir: &TempDir, buffer_size: usize, n: usize) {
    let state = DriftState::open(dir.path().join(".drift"), buffer_size).unwrap();
    for i in 0..n {
        state.record(FeatureRow::new().with("mean_radius", 40.0 + i as f64), Score(0.95)).unwrap();
    }
}

#[test]
fn test_validate_command_basic() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs { config: create_test_config(&dir, 10) };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_rejects_zero_buffer() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs { config: create_test_config(&dir, 0) };
    let err = validate::run_validate(args, LogLevel::Quiet).unwrap_err();
    assert!(err.contains("Invalid buffer size"));
}

#[test]
fn test_validate_command_missing_file() {
    let args = ValidateArgs { config: PathBuf::from("/nonexistent/config.yaml") };
    let err = validate::run_validate(args, LogLevel::Quiet).unwrap_err();
    assert!(err.starts_with("Config error"));
}

#[test]
fn test_format_config_summary() {
    let dir = TempDir::new().unwrap();
    let config = load_config(create_test_config(&dir, 10)).unwrap();
    let summary = validate::format_config_summary(&config);
    assert!(summary.contains("Model: logistic_regression"));
    assert!(summary.contains("Buffer size: 10"));
    assert!(summary.contains("Save retries: 2"));
}

#[test]
fn test_status_command() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, 10);
    buffer_samples(&dir, 10, 4);

    let args = StatusArgs { config, format: OutputFormat::Json };
    assert!(status::run_status(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_format_status_lists_missing_reports() {
    let dir = TempDir::new().unwrap();
    let config = MonitorConfig::load(create_test_config(&dir, 10)).unwrap();
    let context = crate::serving::MonitoringContext::from_config(config).unwrap();
    let text = status::format_status(&context.status().unwrap());
    context.shutdown();

    assert!(text.contains("Buffered: 0/10 inputs, 0/10 predictions"));
    assert!(text.contains("inputs report: not yet available"));
    assert!(text.contains("predictions report: not yet available"));
}

#[test]
fn test_check_command_with_empty_buffer() {
    let dir = TempDir::new().unwrap();
    let args = CheckArgs { config: create_test_config(&dir, 10), fail_on_drift: true };
    assert!(check::run_check(args, LogLevel::Quiet).is_ok());
    assert!(!dir.path().join("reports/data_drift.html").exists());
}

#[test]
fn test_check_command_writes_reports_and_resets() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, 10);
    buffer_samples(&dir, 10, 6);

    let args = CheckArgs { config, fail_on_drift: false };
    assert!(check::run_check(args, LogLevel::Quiet).is_ok());

    let store = FsReportStore::open(dir.path().join("reports")).unwrap();
    let report = store.load(ReportStream::Inputs).unwrap().unwrap();
    assert_eq!(report.current_rows, 6);
    assert_eq!(report.reference_rows, 30);
    assert!(!dir.path().join(".drift/input_buffer.csv").exists());
}

#[test]
fn test_check_command_fail_on_drift() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, 50);
    // Every buffered radius lies beyond the reference range
    buffer_samples(&dir, 50, 30);

    let args = CheckArgs { config, fail_on_drift: true };
    let err = check::run_check(args, LogLevel::Quiet).unwrap_err();
    assert_eq!(err, "Drift detected");
}

#[test]
fn test_run_command_dispatch() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, 10);
    let cli = parse_args(["centinela", "-q", "validate", config.to_str().unwrap()]).unwrap();
    assert!(run_command(cli).is_ok());
}
