//! Crate-level error type.
//!
//! Each subsystem has its own error enum; this type wraps them for callers
//! that drive the whole monitor (startup, the CLI).

use thiserror::Error;

use crate::config::ConfigError;
use crate::eval::drift::EvaluationError;
use crate::monitor::buffer::BufferError;
use crate::monitor::reference::ReferenceError;
use crate::monitor::report::ReportError;

/// Result type alias for centinela operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("drift evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// IO error with context.
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the error comes from operator input rather than the runtime.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Reference(_))
    }
}
