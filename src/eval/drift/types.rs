//! Type definitions for drift detection.

use serde::{Deserialize, Serialize};

/// Statistical test applied to one column
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum DriftTest {
    /// Two-sample Kolmogorov-Smirnov test (numeric columns)
    KS { threshold: f64 },
    /// Chi-square goodness of fit against the reference histogram (categorical columns)
    ChiSquare { threshold: f64 },
    /// Population Stability Index (numeric columns)
    PSI { threshold: f64 },
}

impl DriftTest {
    pub fn name(&self) -> &'static str {
        match self {
            DriftTest::KS { .. } => "Kolmogorov-Smirnov",
            DriftTest::ChiSquare { .. } => "Chi-Square",
            DriftTest::PSI { .. } => "PSI",
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            DriftTest::KS { threshold }
            | DriftTest::ChiSquare { threshold }
            | DriftTest::PSI { threshold } => *threshold,
        }
    }

    /// Whether this test applies to numeric or categorical columns
    pub fn applies_to(&self, kind: ColumnKind) -> bool {
        match self {
            DriftTest::KS { .. } | DriftTest::PSI { .. } => kind == ColumnKind::Numeric,
            DriftTest::ChiSquare { .. } => kind == ColumnKind::Categorical,
        }
    }
}

/// How a column is compared
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Severity levels for drift
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// No drift detected
    None,
    /// Close to the threshold
    Warning,
    /// Test failed
    Critical,
}

/// Outcome of one test on one column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub column: String,
    pub kind: ColumnKind,
    pub test: DriftTest,
    /// KS distance, chi-square statistic or PSI value
    pub statistic: f64,
    /// `None` for PSI, which has no p-value
    pub p_value: Option<f64>,
    pub drifted: bool,
    pub severity: Severity,
}

/// Summary of drift detection results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Column tests run
    pub total_tests: usize,
    /// Distinct columns with at least one drifted test
    pub drifted_columns: usize,
    pub warnings: usize,
    pub critical: usize,
}

impl DriftSummary {
    pub fn from_results(results: &[ColumnDrift]) -> Self {
        let mut drifted: Vec<&str> =
            results.iter().filter(|r| r.drifted).map(|r| r.column.as_str()).collect();
        drifted.sort_unstable();
        drifted.dedup();

        Self {
            total_tests: results.len(),
            drifted_columns: drifted.len(),
            warnings: results.iter().filter(|r| r.severity == Severity::Warning).count(),
            critical: results.iter().filter(|r| r.severity == Severity::Critical).count(),
        }
    }

    pub fn has_critical(&self) -> bool {
        self.critical > 0
    }
}
