//! Request/response types and the classifier boundary

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::sample::FeatureRow;

/// Serving errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServingError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid class probabilities {0:?} (expected two values in [0, 1])")]
    InvalidProbabilities([f64; 2]),
}

/// A trained binary classifier. Preprocessing, if any, is the
/// implementation's concern.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p(0), p(1)]` for one input row.
    fn predict_proba(&self, input: &FeatureRow) -> Result<[f64; 2], ServingError>;
}

impl<F> Classifier for F
where
    F: Fn(&FeatureRow) -> Result<[f64; 2], ServingError> + Send + Sync,
{
    fn predict_proba(&self, input: &FeatureRow) -> Result<[f64; 2], ServingError> {
        self(input)
    }
}

/// Human-readable names of the two classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabels {
    pub negative: String,
    pub positive: String,
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self { negative: "malignant".to_string(), positive: "benign".to_string() }
    }
}

impl ClassLabels {
    pub fn label(&self, class: u8) -> &str {
        if class == 1 {
            &self.positive
        } else {
            &self.negative
        }
    }
}

/// One row to score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub features: FeatureRow,
}

impl From<FeatureRow> for PredictionRequest {
    fn from(features: FeatureRow) -> Self {
        Self { features }
    }
}

/// Prediction for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted class (0 or 1)
    pub prediction: u8,
    /// Probability of the predicted class
    pub prediction_prob: f64,
    /// Label of the predicted class
    pub label: String,
}
