//! Buffer error types

use std::path::{Path, PathBuf};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Durability and integrity errors raised by [`super::SampleBuffer`].
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("buffer capacity must be positive")]
    ZeroCapacity,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("corrupt buffer file {path} at line {line}: {message}")]
    Corrupt { path: PathBuf, line: u64, message: String },

    #[error("record has no columns")]
    EmptyRecord,

    #[error("record columns {found:?} do not match buffered columns {expected:?}")]
    SchemaMismatch { expected: Vec<String>, found: Vec<String> },
}

impl BufferError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv { path: path.to_path_buf(), source }
    }
}
