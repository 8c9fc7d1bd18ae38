//! Online drift monitoring
//!
//! Every served prediction adds one input row and one score to a durable
//! sliding window ([`DriftState`]). When the window fills, [`DriftMonitor`]
//! runs a drift check off the serving path: both streams are compared
//! against the training [`ReferenceData`], the reports are saved to a
//! [`DriftReportStore`], and the window starts over.

pub mod buffer;
pub mod orchestrator;
pub mod reference;
pub mod report;
pub mod sample;
pub mod state;

pub use buffer::{BufferError, BufferResult, BufferStatus, SampleBuffer};
pub use orchestrator::{CheckOutcome, DriftMonitor, MonitorSettings, MonitorStats};
pub use reference::{ReferenceData, ReferenceError};
pub use report::{
    DriftReport, DriftReportStore, FsReportStore, InMemoryReportStore, ReportError, ReportResult,
    ReportStream,
};
pub use sample::{Dataset, FeatureRow, FeatureValue, InvalidRecord, Score, TabularRecord};
pub use state::{BufferLengths, DriftState, Window};
