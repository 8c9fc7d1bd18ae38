//! Prediction service with drift monitoring on the side

use std::sync::Arc;

use tracing::{debug, error};

use super::types::{ClassLabels, Classifier, PredictionRequest, PredictionResponse, ServingError};
use crate::monitor::orchestrator::DriftMonitor;
use crate::monitor::sample::Score;

/// Scores requests with a [`Classifier`] and hands every served row to the
/// drift monitor. Monitoring never changes a response or fails a request.
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    monitor: Option<Arc<DriftMonitor>>,
    labels: ClassLabels,
}

impl PredictionService {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier, monitor: None, labels: ClassLabels::default() }
    }

    /// Attach a drift monitor
    pub fn with_monitor(mut self, monitor: Arc<DriftMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_labels(mut self, labels: ClassLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Score a batch. The batch fails as a whole if the classifier fails on
    /// any row; rows are only recorded for monitoring once all succeeded.
    pub fn predict(
        &self,
        requests: &[PredictionRequest],
    ) -> Result<Vec<PredictionResponse>, ServingError> {
        debug!(rows = requests.len(), "running prediction");
        let probabilities = requests
            .iter()
            .map(|r| self.classifier.predict_proba(&r.features).and_then(check_probabilities))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| error!(error = %e, "prediction failed"))?;

        let mut responses = Vec::with_capacity(requests.len());
        for (request, proba) in requests.iter().zip(probabilities) {
            if let Some(monitor) = &self.monitor {
                monitor.on_prediction(request.features.clone(), Score(proba[1]));
            }
            let class = u8::from(proba[1] >= proba[0]);
            responses.push(PredictionResponse {
                prediction: class,
                prediction_prob: proba[usize::from(class)],
                label: self.labels.label(class).to_string(),
            });
        }
        Ok(responses)
    }
}

fn check_probabilities(proba: [f64; 2]) -> Result<[f64; 2], ServingError> {
    if proba.iter().all(|p| (0.0..=1.0).contains(p)) {
        Ok(proba)
    } else {
        Err(ServingError::InvalidProbabilities(proba))
    }
}
