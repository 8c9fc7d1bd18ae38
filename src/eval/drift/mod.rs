//! Drift Evaluation
//!
//! Compares a window of production data against the training-time
//! reference and produces a verdict plus an HTML report.
//!
//! Provides:
//! - [`DriftEvaluationEngine`], the pluggable engine seam
//! - [`StatisticalEngine`], per-column Kolmogorov-Smirnov, Chi-square and PSI tests

mod engine;
mod error;
mod render;
mod statistical;
mod types;


pub use engine::{DriftEvaluationEngine, DriftVerdict, StatisticalEngine};
pub use error::{EvaluationError, EvaluationResult};
pub use render::{render_html, RenderedReport};
pub use statistical::{chi_square_p_value, chi_square_statistic, erf, ks_p_value, ks_statistic, psi};
pub use types::{ColumnDrift, ColumnKind, DriftSummary, DriftTest, Severity};
