//! Configuration error types

use std::path::PathBuf;

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config syntax in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid buffer size: {0} (must be > 0)")]
    InvalidBufferSize(usize),

    #[error("Invalid evaluation timeout: {0}s (must be > 0)")]
    InvalidTimeout(u64),

    #[error("Model name cannot be empty")]
    EmptyModelName,

    #[error("Directory is not writable: {path}: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference data not found: {0}")]
    ReferenceNotFound(PathBuf),
}
