//! Configuration validation logic

use std::fs;
use std::path::Path;

use super::error::ConfigError;
use crate::config::schema::MonitorConfig;

const WRITE_CHECK_FILE: &str = ".centinela-write-check";

/// Validate a monitoring configuration
///
/// Checks:
/// - Numeric values are in valid ranges
/// - Buffer and report directories can be created and written
/// - The reference export exists
pub fn validate_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    if config.model.name.trim().is_empty() {
        return Err(ConfigError::EmptyModelName);
    }

    let drift = &config.drift;
    if drift.buffer_size == 0 {
        return Err(ConfigError::InvalidBufferSize(drift.buffer_size));
    }
    if drift.evaluation_timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout(drift.evaluation_timeout_secs));
    }

    check_writable(&drift.path)?;
    if drift.report_dir() != drift.path {
        check_writable(drift.report_dir())?;
    }

    if !drift.reference_path.is_file() {
        return Err(ConfigError::ReferenceNotFound(drift.reference_path.clone()));
    }

    Ok(())
}

/// Create `dir` if needed and write then remove a scratch file in it.
fn check_writable(dir: &Path) -> Result<(), ConfigError> {
    let not_writable = |source| ConfigError::NotWritable { path: dir.to_path_buf(), source };
    fs::create_dir_all(dir).map_err(not_writable)?;
    let scratch = dir.join(WRITE_CHECK_FILE);
    fs::write(&scratch, b"").map_err(not_writable)?;
    fs::remove_file(&scratch).map_err(not_writable)
}
