//! Training-time baseline the live windows are compared against.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::monitor::sample::{Dataset, FeatureRow, FeatureValue, Score, SCORE_COLUMN};

/// Label and hard-prediction columns of the training export. They are not
/// model inputs and are dropped from the input reference.
pub const NON_FEATURE_COLUMNS: [&str; 3] = ["target", "pred", SCORE_COLUMN];

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("cannot read reference data {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("reference data {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("malformed reference data {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("reference data {0} has no rows")]
    Empty(PathBuf),
}

/// Reference inputs and scores for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    inputs: Dataset,
    predictions: Dataset,
}

impl ReferenceData {
    pub fn new(inputs: Dataset, predictions: Dataset) -> Self {
        Self { inputs, predictions }
    }

    pub fn from_records(inputs: &[FeatureRow], predictions: &[Score]) -> Self {
        Self::new(Dataset::from_records(inputs), Dataset::from_records(predictions))
    }

    /// Load a training export: feature columns plus `target`, `pred` and
    /// `proba`.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let csv_err = |source| ReferenceError::Csv { path: path.to_path_buf(), source };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let columns: Vec<String> =
            reader.headers().map_err(csv_err)?.iter().map(str::to_string).collect();
        if !columns.iter().any(|c| c == SCORE_COLUMN) {
            return Err(ReferenceError::MissingColumn {
                path: path.to_path_buf(),
                column: SCORE_COLUMN.to_string(),
            });
        }

        let mut table = Dataset::new(columns);
        for row in reader.records() {
            let row = row.map_err(csv_err)?;
            table.push_row(row.iter().map(FeatureValue::parse).collect()).map_err(|e| {
                ReferenceError::Malformed { path: path.to_path_buf(), message: e.0 }
            })?;
        }
        if table.is_empty() {
            return Err(ReferenceError::Empty(path.to_path_buf()));
        }

        Ok(Self::new(table.without_columns(&NON_FEATURE_COLUMNS), table.select(&[SCORE_COLUMN])))
    }

    pub fn inputs(&self) -> &Dataset {
        &self.inputs
    }

    pub fn predictions(&self) -> &Dataset {
        &self.predictions
    }
}
