//! Drift Report Store
//!
//! Keeps the most recent drift report per stream (`inputs`, `predictions`)
//! at a well-known location. A missing report means "not yet available".

mod error;
mod fs_store;
mod in_memory;
mod traits;
mod types;


pub use error::{ReportError, ReportResult};
pub use fs_store::FsReportStore;
pub use in_memory::InMemoryReportStore;
pub use traits::DriftReportStore;
pub use types::{DriftReport, ReportStream};
