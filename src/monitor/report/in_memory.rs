//! In-memory report store implementation

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::error::ReportResult;
use super::traits::DriftReportStore;
use super::types::{DriftReport, ReportStream};

/// Report store that keeps reports in process memory
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: Mutex<HashMap<ReportStream, DriftReport>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams with a report
    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DriftReportStore for InMemoryReportStore {
    fn save(&self, stream: ReportStream, report: &DriftReport) -> ReportResult<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(stream, report.clone());
        Ok(())
    }

    fn load(&self, stream: ReportStream) -> ReportResult<Option<DriftReport>> {
        Ok(self.reports.lock().unwrap_or_else(PoisonError::into_inner).get(&stream).cloned())
    }
}
