//! Drift report types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::eval::drift::{DriftVerdict, RenderedReport};

/// A monitored series of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStream {
    /// Model inputs (data drift)
    Inputs,
    /// Predicted probabilities (prediction drift)
    Predictions,
}

impl ReportStream {
    pub const ALL: [ReportStream; 2] = [ReportStream::Inputs, ReportStream::Predictions];

    /// File stem of the persisted artifact
    pub fn stem(self) -> &'static str {
        match self {
            Self::Inputs => "data_drift",
            Self::Predictions => "pred_drift",
        }
    }

    /// Human-readable report title
    pub fn title(self) -> &'static str {
        match self {
            Self::Inputs => "Data drift",
            Self::Predictions => "Prediction drift",
        }
    }
}

impl fmt::Display for ReportStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inputs => f.write_str("inputs"),
            Self::Predictions => f.write_str("predictions"),
        }
    }
}

/// Result of one drift evaluation for one stream.
///
/// The serialized form carries the HTML artifact, so one JSON document is a
/// complete report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub model: String,
    pub stream: ReportStream,
    pub drift_detected: bool,
    pub current_rows: usize,
    pub reference_rows: usize,
    pub generated_at: DateTime<Utc>,
    pub details: serde_json::Value,
    #[serde(default)]
    pub artifact: RenderedReport,
}

impl DriftReport {
    pub fn from_verdict(
        model: impl Into<String>,
        stream: ReportStream,
        verdict: DriftVerdict,
        current_rows: usize,
        reference_rows: usize,
    ) -> Self {
        Self {
            model: model.into(),
            stream,
            drift_detected: verdict.drift_detected,
            current_rows,
            reference_rows,
            generated_at: Utc::now(),
            details: verdict.details,
            artifact: verdict.report,
        }
    }
}
