//! Drift evaluation engines.
//!
//! [`DriftEvaluationEngine`] is the seam between the monitoring core and the
//! statistics. The core only calls it from background work, so an engine may
//! take seconds. [`StatisticalEngine`] is the in-process default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{EvaluationError, EvaluationResult};
use super::render::{render_html, RenderedReport};
use super::statistical::{chi_square_p_value, chi_square_statistic, ks_p_value, ks_statistic, psi};
use super::types::{ColumnDrift, ColumnKind, DriftSummary, DriftTest, Severity};
use crate::monitor::sample::{Dataset, FeatureValue};

/// Verdict for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftVerdict {
    pub drift_detected: bool,
    /// Engine-specific structured payload
    pub details: serde_json::Value,
    pub report: RenderedReport,
}

/// Compares a current window against a reference dataset.
pub trait DriftEvaluationEngine: Send + Sync {
    fn evaluate(&self, current: &Dataset, reference: &Dataset) -> EvaluationResult<DriftVerdict>;
}

impl<F> DriftEvaluationEngine for F
where
    F: Fn(&Dataset, &Dataset) -> EvaluationResult<DriftVerdict> + Send + Sync,
{
    fn evaluate(&self, current: &Dataset, reference: &Dataset) -> EvaluationResult<DriftVerdict> {
        self(current, reference)
    }
}

/// Per-column KS / chi-square / PSI drift engine.
///
/// A column is numeric when every non-missing cell in both datasets is a
/// number, categorical otherwise. The stream is drifted when any column test
/// reaches [`Severity::Critical`].
#[derive(Debug, Clone)]
pub struct StatisticalEngine {
    tests: Vec<DriftTest>,
    warning_multiplier: f64,
    title: String,
}

impl Default for StatisticalEngine {
    fn default() -> Self {
        Self::new(vec![DriftTest::KS { threshold: 0.05 }, DriftTest::ChiSquare { threshold: 0.05 }])
    }
}

impl StatisticalEngine {
    pub fn new(tests: Vec<DriftTest>) -> Self {
        Self { tests, warning_multiplier: 0.8, title: "Drift report".to_string() }
    }

    /// Warn when a test is within this fraction of its threshold.
    pub fn with_warning_multiplier(mut self, multiplier: f64) -> Self {
        self.warning_multiplier = multiplier;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn tests(&self) -> &[DriftTest] {
        &self.tests
    }

    /// Run every applicable test on every column of `current`.
    pub fn check(&self, current: &Dataset, reference: &Dataset) -> EvaluationResult<Vec<ColumnDrift>> {
        if current.is_empty() {
            return Err(EvaluationError::EmptyDataset { which: "current" });
        }
        if reference.is_empty() {
            return Err(EvaluationError::EmptyDataset { which: "reference" });
        }

        let mut results = Vec::new();
        for column in current.columns() {
            let cur = current.column(column).unwrap_or_default();
            let reference_cells = reference
                .column(column)
                .ok_or_else(|| EvaluationError::SchemaMismatch { column: column.clone() })?;

            let kind = column_kind(cur.iter().chain(reference_cells.iter()).copied());
            for test in self.tests.iter().filter(|t| t.applies_to(kind)) {
                if let Some(result) = self.run_test(column, kind, *test, &cur, &reference_cells) {
                    results.push(result);
                }
            }
        }
        Ok(results)
    }

    fn run_test(
        &self,
        column: &str,
        kind: ColumnKind,
        test: DriftTest,
        current: &[&FeatureValue],
        reference: &[&FeatureValue],
    ) -> Option<ColumnDrift> {
        let (statistic, p_value) = match test {
            DriftTest::KS { .. } => {
                let (r, c) = (numeric(reference), numeric(current));
                if r.is_empty() || c.is_empty() {
                    return None;
                }
                let d = ks_statistic(&r, &c);
                (d, Some(ks_p_value(d, r.len(), c.len())))
            }
            DriftTest::PSI { .. } => {
                let (r, c) = (numeric(reference), numeric(current));
                if r.is_empty() || c.is_empty() {
                    return None;
                }
                (psi(&r, &c), None)
            }
            DriftTest::ChiSquare { .. } => {
                let (r, c) = (histogram(reference), histogram(current));
                if r.is_empty() || c.is_empty() {
                    return None;
                }
                let (chi_sq, df) = chi_square_statistic(&r, &c);
                (chi_sq, Some(chi_square_p_value(chi_sq, df)))
            }
        };

        let severity = self.classify(test, statistic, p_value);
        Some(ColumnDrift {
            column: column.to_string(),
            kind,
            test,
            statistic,
            p_value,
            drifted: severity != Severity::None,
            severity,
        })
    }

    fn classify(&self, test: DriftTest, statistic: f64, p_value: Option<f64>) -> Severity {
        let threshold = test.threshold();
        match p_value {
            Some(p) if p < threshold => Severity::Critical,
            Some(p) if p < threshold / self.warning_multiplier => Severity::Warning,
            Some(_) => Severity::None,
            // PSI: larger is worse
            None if statistic >= threshold => Severity::Critical,
            None if statistic >= threshold * self.warning_multiplier => Severity::Warning,
            None => Severity::None,
        }
    }
}

impl DriftEvaluationEngine for StatisticalEngine {
    fn evaluate(&self, current: &Dataset, reference: &Dataset) -> EvaluationResult<DriftVerdict> {
        let results = self.check(current, reference)?;
        let summary = DriftSummary::from_results(&results);
        let report = render_html(&self.title, &results, &summary);

        let details = serde_json::json!({
            "current_rows": current.len(),
            "reference_rows": reference.len(),
            "columns": results,
            "summary": summary,
        });

        Ok(DriftVerdict { drift_detected: summary.has_critical(), details, report })
    }
}

fn column_kind<'a>(cells: impl Iterator<Item = &'a FeatureValue>) -> ColumnKind {
    let mut cells = cells.filter(|v| !v.is_missing()).peekable();
    if cells.peek().is_none() {
        return ColumnKind::Numeric;
    }
    if cells.all(|v| v.as_f64().is_some()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn numeric(cells: &[&FeatureValue]) -> Vec<f64> {
    cells.iter().filter_map(|v| v.as_f64()).filter(|v| v.is_finite()).collect()
}

fn histogram(cells: &[&FeatureValue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cell in cells.iter().filter(|v| !v.is_missing()) {
        *counts.entry(cell.to_cell()).or_insert(0) += 1;
    }
    counts
}
