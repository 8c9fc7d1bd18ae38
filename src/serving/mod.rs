//! Serving wrapper
//!
//! [`PredictionService`] turns class probabilities into labelled responses
//! and feeds the drift monitor; [`MonitoringContext`] wires the monitor up
//! from configuration.

mod context;
mod service;
mod types;


pub use context::{MonitorStatus, MonitoringContext, ReportStatus};
pub use service::PredictionService;
pub use types::{ClassLabels, Classifier, PredictionRequest, PredictionResponse, ServingError};
