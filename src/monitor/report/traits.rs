//! Report store trait definitions

use super::error::ReportResult;
use super::types::{DriftReport, ReportStream};

/// Keeps the latest drift report per stream.
pub trait DriftReportStore: Send + Sync {
    /// Persist `report` as the latest one for `stream`, replacing any prior report
    fn save(&self, stream: ReportStream, report: &DriftReport) -> ReportResult<()>;

    /// Latest report for `stream`, or `None` if none was generated yet
    fn load(&self, stream: ReportStream) -> ReportResult<Option<DriftReport>>;
}
