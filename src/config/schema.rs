//! YAML schema for the monitoring configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::monitor::orchestrator::MonitorSettings;

/// Complete monitoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Served model
    pub model: ModelSection,

    /// Drift monitoring
    pub drift: DriftSection,
}

/// Served model identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Name used in logs and report metadata
    pub name: String,
}

/// Drift buffer, reference and report locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSection {
    /// Directory holding `input_buffer.csv` and `pred_buffer.csv`
    pub path: PathBuf,

    /// Report directory; defaults to `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,

    /// Samples per drift window
    pub buffer_size: usize,

    /// Training export used as the drift baseline
    pub reference_path: PathBuf,

    /// Upper bound on one engine call, in seconds
    #[serde(default = "default_evaluation_timeout_secs")]
    pub evaluation_timeout_secs: u64,

    /// Extra attempts after a failed report save
    #[serde(default = "default_save_retries")]
    pub save_retries: u32,
}

fn default_evaluation_timeout_secs() -> u64 {
    60
}

fn default_save_retries() -> u32 {
    2
}

impl DriftSection {
    /// Effective report directory
    pub fn report_dir(&self) -> &Path {
        self.report_path.as_deref().unwrap_or(&self.path)
    }

    /// Orchestrator settings derived from this section
    pub fn settings(&self) -> MonitorSettings {
        MonitorSettings {
            evaluation_timeout: Duration::from_secs(self.evaluation_timeout_secs),
            save_retries: self.save_retries,
            ..MonitorSettings::default()
        }
    }
}
