//! Evaluation error types

use std::time::Duration;

/// Result type for drift evaluation
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// A drift evaluation that produced no verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("{which} dataset is empty")]
    EmptyDataset { which: &'static str },

    #[error("column '{column}' is missing from the reference dataset")]
    SchemaMismatch { column: String },

    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),

    #[error("evaluation aborted: {0}")]
    Aborted(String),

    #[error("drift engine failed: {0}")]
    Engine(String),
}
