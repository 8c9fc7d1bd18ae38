//! Report store error types

use std::path::PathBuf;

/// Result type for report store operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Report store errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}
