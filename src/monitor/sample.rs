//! Sample records accumulated by the drift buffers.
//!
//! A buffer holds records of exactly one kind: either [`FeatureRow`]s (the
//! model inputs) or [`Score`]s (the predicted probability of the positive
//! class). Both implement [`TabularRecord`], which is all a buffer needs to
//! persist them as CSV rows and to hand them to a drift engine as a
//! columnar [`Dataset`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column under which prediction scores are persisted.
pub const SCORE_COLUMN: &str = "proba";

/// Marks a buffered cell as categorical when its text alone is ambiguous.
pub const CATEGORY_ESCAPE: char = '\'';

/// A record could not be rebuilt from its tabular form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record: {0}")]
pub struct InvalidRecord(pub String);

/// One cell of a tabular sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric feature
    Number(f64),
    /// Categorical feature
    Category(String),
    /// Empty cell
    Missing,
}

impl FeatureValue {
    /// Parse a cell of an external CSV export. Anything that parses as
    /// `f64` is numeric, empty cells are missing, everything else is
    /// categorical.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            return Self::Missing;
        }
        match cell.parse::<f64>() {
            Ok(v) => Self::Number(v),
            Err(_) => Self::Category(cell.to_string()),
        }
    }

    /// Encode for a buffer file so that [`FeatureValue::decode_cell`]
    /// restores the exact variant. Categories that would read back as a
    /// number, as missing, or that start with the escape character are
    /// prefixed with [`CATEGORY_ESCAPE`].
    pub fn encode_cell(&self) -> String {
        match self {
            Self::Category(s) if is_ambiguous(s) => format!("{CATEGORY_ESCAPE}{s}"),
            other => other.to_cell(),
        }
    }

    /// Inverse of [`FeatureValue::encode_cell`]. Cells are taken verbatim,
    /// whitespace included.
    pub fn decode_cell(cell: &str) -> Self {
        if let Some(category) = cell.strip_prefix(CATEGORY_ESCAPE) {
            return Self::Category(category.to_string());
        }
        if cell.is_empty() {
            return Self::Missing;
        }
        match cell.parse::<f64>() {
            Ok(v) => Self::Number(v),
            Err(_) => Self::Category(cell.to_string()),
        }
    }

    /// Render as a CSV cell.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Category(s) => s.clone(),
            Self::Missing => String::new(),
        }
    }

    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Categorical value, if this is a category.
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

fn is_ambiguous(category: &str) -> bool {
    category.is_empty() || category.starts_with(CATEGORY_ESCAPE) || category.parse::<f64>().is_ok()
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        Self::Category(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        Self::Category(v)
    }
}

impl<T: Into<FeatureValue>> From<Option<T>> for FeatureValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

/// A record that can be stored as one row of a table with named columns.
pub trait TabularRecord: Clone + Send + Sync + 'static {
    /// Column names, in persisted order.
    fn columns(&self) -> Vec<String>;

    /// Cell values, aligned with [`TabularRecord::columns`].
    fn values(&self) -> Vec<FeatureValue>;

    /// Rebuild a record from a header and one row of cells.
    fn from_values(columns: &[String], values: Vec<FeatureValue>) -> Result<Self, InvalidRecord>;
}

/// One request's model input: named feature values in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    fields: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a feature, replacing the value in place if the column exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureRow
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl TabularRecord for FeatureRow {
    fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    fn values(&self) -> Vec<FeatureValue> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }

    fn from_values(columns: &[String], values: Vec<FeatureValue>) -> Result<Self, InvalidRecord> {
        if columns.len() != values.len() {
            return Err(InvalidRecord(format!(
                "expected {} cells, found {}",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { fields: columns.iter().cloned().zip(values).collect() })
    }
}

/// Predicted probability of the positive class for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score(pub f64);

impl Score {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl TabularRecord for Score {
    fn columns(&self) -> Vec<String> {
        vec![SCORE_COLUMN.to_string()]
    }

    fn values(&self) -> Vec<FeatureValue> {
        vec![FeatureValue::Number(self.0)]
    }

    fn from_values(columns: &[String], values: Vec<FeatureValue>) -> Result<Self, InvalidRecord> {
        match (columns, values.as_slice()) {
            ([col], [FeatureValue::Number(v)]) if col == SCORE_COLUMN => Ok(Self(*v)),
            ([col], [other]) if col == SCORE_COLUMN => {
                Err(InvalidRecord(format!("score must be numeric, found {other:?}")))
            }
            _ => Err(InvalidRecord(format!("expected a single '{SCORE_COLUMN}' column, found {columns:?}"))),
        }
    }
}

/// Columnar view over a batch of records, as consumed by drift engines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<FeatureValue>>,
}

impl Dataset {
    /// Empty dataset with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build from records. The header is taken from the first record; later
    /// records are aligned to it by column name.
    pub fn from_records<R: TabularRecord>(records: &[R]) -> Self {
        let Some(first) = records.first() else {
            return Self::default();
        };
        let columns = first.columns();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let record_columns = record.columns();
            let values = record.values();
            if record_columns == columns {
                rows.push(values);
                continue;
            }
            let aligned = columns
                .iter()
                .map(|c| {
                    record_columns
                        .iter()
                        .position(|rc| rc == c)
                        .map_or(FeatureValue::Missing, |i| values[i].clone())
                })
                .collect();
            rows.push(aligned);
        }
        Self { columns, rows }
    }

    /// Append one row; it must match the header width.
    pub fn push_row(&mut self, row: Vec<FeatureValue>) -> Result<(), InvalidRecord> {
        if row.len() != self.columns.len() {
            return Err(InvalidRecord(format!(
                "row has {} cells, header has {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<FeatureValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<&FeatureValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Copy of this dataset without the named columns.
    pub fn without_columns(&self, drop: &[&str]) -> Self {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !drop.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();
        Self {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        }
    }

    /// Copy of this dataset restricted to the named columns, in the given order.
    /// Unknown names are ignored.
    pub fn select(&self, names: &[&str]) -> Self {
        let keep: Vec<usize> = names
            .iter()
            .filter_map(|n| self.columns.iter().position(|c| c == n))
            .collect();
        Self {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_value_parse() {
        assert_eq!(FeatureValue::parse("1.5"), FeatureValue::Number(1.5));
        assert_eq!(FeatureValue::parse(" -3 "), FeatureValue::Number(-3.0));
        assert_eq!(FeatureValue::parse("red"), FeatureValue::Category("red".into()));
        assert_eq!(FeatureValue::parse(""), FeatureValue::Missing);
    }

    #[test]
    fn test_feature_value_cell_round_trip() {
        for v in [0.1, 14.5, 1e-7, -2.0] {
            let cell = FeatureValue::Number(v).to_cell();
            assert_eq!(FeatureValue::parse(&cell), FeatureValue::Number(v));
        }
        assert_eq!(FeatureValue::Missing.to_cell(), "");
    }

    #[test]
    fn test_encoded_cells_keep_their_variant() {
        let values = [
            FeatureValue::Category("02139".into()),
            FeatureValue::Category(" x ".into()),
            FeatureValue::Category(String::new()),
            FeatureValue::Category("'quoted".into()),
            FeatureValue::Category("inf".into()),
            FeatureValue::Category("red".into()),
            FeatureValue::Number(2139.0),
            FeatureValue::Number(-0.25),
            FeatureValue::Missing,
        ];
        for value in values {
            assert_eq!(FeatureValue::decode_cell(&value.encode_cell()), value);
        }
        assert_eq!(FeatureValue::Category("red".into()).encode_cell(), "red");
        assert_eq!(FeatureValue::Category("02139".into()).encode_cell(), "'02139");
    }

    #[test]
    fn test_feature_row_insert_replaces() {
        let row = FeatureRow::new().with("a", 1.0).with("b", "x").with("a", 2.0);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a"), Some(&FeatureValue::Number(2.0)));
        assert_eq!(row.columns(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_feature_row_from_values_width_mismatch() {
        let cols = vec!["a".to_string(), "b".to_string()];
        let err = FeatureRow::from_values(&cols, vec![FeatureValue::Number(1.0)]).unwrap_err();
        assert!(err.0.contains("expected 2 cells"));
    }

    #[test]
    fn test_score_from_values() {
        let cols = vec![SCORE_COLUMN.to_string()];
        let score = Score::from_values(&cols, vec![FeatureValue::Number(0.3)]).unwrap();
        assert_eq!(score, Score(0.3));

        assert!(Score::from_values(&cols, vec![FeatureValue::Category("x".into())]).is_err());
        assert!(Score::from_values(&["p".to_string()], vec![FeatureValue::Number(0.3)]).is_err());
    }

    #[test]
    fn test_dataset_from_records_aligns_columns() {
        let rows = vec![
            FeatureRow::new().with("a", 1.0).with("b", 2.0),
            FeatureRow::new().with("b", 4.0).with("a", 3.0),
        ];
        let ds = Dataset::from_records(&rows);
        assert_eq!(ds.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(ds.rows()[1], vec![FeatureValue::Number(3.0), FeatureValue::Number(4.0)]);
    }

    #[test]
    fn test_dataset_without_and_select() {
        let rows = vec![FeatureRow::new().with("x", 1.0).with("target", 0.0).with("proba", 0.9)];
        let ds = Dataset::from_records(&rows);

        let features = ds.without_columns(&["target", "proba"]);
        assert_eq!(features.columns(), &["x".to_string()]);

        let preds = ds.select(&["proba"]);
        assert_eq!(preds.column("proba").unwrap(), vec![&FeatureValue::Number(0.9)]);
    }

    #[test]
    fn test_dataset_push_row_width() {
        let mut ds = Dataset::new(vec!["a".into()]);
        assert!(ds.push_row(vec![FeatureValue::Missing]).is_ok());
        assert!(ds.push_row(vec![]).is_err());
        assert_eq!(ds.len(), 1);
    }
}
