//! Model Evaluation
//!
//! - `drift`: statistical drift tests and the engine seam used by the monitor

pub mod drift;

pub use drift::{DriftEvaluationEngine, DriftVerdict, EvaluationError, StatisticalEngine};
