//! Application context for a served model
//!
//! Built once at startup from a validated [`MonitorConfig`] and passed to
//! whatever handles requests. Owns the monitor and its collaborators.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::eval::drift::StatisticalEngine;
use crate::monitor::orchestrator::{DriftMonitor, MonitorStats};
use crate::monitor::reference::ReferenceData;
use crate::monitor::report::{DriftReport, DriftReportStore, FsReportStore, ReportStream};
use crate::monitor::state::DriftState;

/// Availability of the latest report for one stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStatus {
    pub stream: ReportStream,
    pub available: bool,
    pub drift_detected: Option<bool>,
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReportStatus {
    fn new(stream: ReportStream, report: Option<&DriftReport>) -> Self {
        Self {
            stream,
            available: report.is_some(),
            drift_detected: report.map(|r| r.drift_detected),
            generated_at: report.map(|r| r.generated_at),
        }
    }
}

/// Snapshot of a monitor for operators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorStatus {
    pub model: String,
    pub buffer_size: usize,
    pub buffered_inputs: usize,
    pub buffered_predictions: usize,
    pub reports: Vec<ReportStatus>,
}

/// Drift monitor, state and report store for one served model
pub struct MonitoringContext {
    config: MonitorConfig,
    state: Arc<DriftState>,
    store: Arc<FsReportStore>,
    monitor: Arc<DriftMonitor>,
}

impl MonitoringContext {
    /// Validate the configuration, recover buffered samples, load the
    /// reference data and start the monitor.
    pub fn from_config(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        let drift = &config.drift;

        let state = Arc::new(DriftState::open(&drift.path, drift.buffer_size)?);
        let reference = Arc::new(ReferenceData::from_csv(&drift.reference_path)?);
        let store = Arc::new(FsReportStore::open(drift.report_dir())?);
        let monitor = Arc::new(DriftMonitor::new(
            config.model.name.clone(),
            Arc::clone(&state),
            reference,
            Arc::new(StatisticalEngine::default()),
            Arc::clone(&store) as Arc<dyn DriftReportStore>,
            drift.settings(),
        )?);

        let lengths = state.lengths();
        info!(
            model = %config.model.name,
            buffer_size = drift.buffer_size,
            inputs = lengths.inputs,
            predictions = lengths.predictions,
            "drift monitoring started"
        );

        Ok(Self { config, state, store, monitor })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn monitor(&self) -> &Arc<DriftMonitor> {
        &self.monitor
    }

    pub fn store(&self) -> &FsReportStore {
        &self.store
    }

    pub fn state(&self) -> &DriftState {
        &self.state
    }

    pub fn stats(&self) -> MonitorStats {
        self.monitor.stats()
    }

    /// Buffer fill and report availability
    pub fn status(&self) -> Result<MonitorStatus> {
        let lengths = self.state.lengths();
        let mut reports = Vec::with_capacity(ReportStream::ALL.len());
        for stream in ReportStream::ALL {
            let report = self.store.load(stream)?;
            reports.push(ReportStatus::new(stream, report.as_ref()));
        }
        Ok(MonitorStatus {
            model: self.config.model.name.clone(),
            buffer_size: self.state.buffer_size(),
            buffered_inputs: lengths.inputs,
            buffered_predictions: lengths.predictions,
            reports,
        })
    }

    /// Wait for a running drift check and stop the worker.
    pub fn shutdown(&self) {
        self.monitor.shutdown();
        info!(model = %self.config.model.name, "drift monitoring stopped");
    }
}
