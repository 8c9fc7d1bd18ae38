//! Tests for the sliding window buffer

use super::*;
use crate::monitor::sample::{FeatureRow, Score};
use proptest::prelude::*;

fn row(v: f64) -> FeatureRow {
    FeatureRow::new().with("mean_radius", v).with("shape", "round")
}

#[test]
fn test_zero_capacity_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = SampleBuffer::<Score>::open(dir.path().join("pred.csv"), 0).unwrap_err();
    assert!(matches!(err, BufferError::ZeroCapacity));
}

#[test]
fn test_missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = SampleBuffer::<Score>::open(dir.path().join("pred.csv"), 3).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 3);
}

#[test]
fn test_empty_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    std::fs::write(&path, "").unwrap();

    let buffer = SampleBuffer::<Score>::open(&path, 3).unwrap();
    assert!(buffer.is_empty());
}

#[test]
fn test_append_reports_full_at_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = SampleBuffer::open(dir.path().join("pred.csv"), 2).unwrap();

    assert_eq!(buffer.append(Score(0.1)).unwrap(), BufferStatus::NotFull);
    assert_eq!(buffer.append(Score(0.2)).unwrap(), BufferStatus::Full);
    // Sliding: stays full and evicts the oldest
    assert_eq!(buffer.append(Score(0.3)).unwrap(), BufferStatus::Full);
    assert_eq!(buffer.snapshot(), vec![Score(0.2), Score(0.3)]);
}

#[test]
fn test_file_mirrors_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    let mut buffer = SampleBuffer::open(&path, 2).unwrap();
    buffer.append(Score(0.25)).unwrap();
    buffer.append(Score(0.5)).unwrap();
    buffer.append(Score(0.75)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "proba\n0.5\n0.75\n");
}

#[test]
fn test_reopen_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let expected = {
        let mut buffer = SampleBuffer::open(&path, 4).unwrap();
        for i in 0..6 {
            buffer.append(row(f64::from(i) + 0.5)).unwrap();
        }
        buffer.snapshot()
    };

    let reopened = SampleBuffer::<FeatureRow>::open(&path, 4).unwrap();
    assert_eq!(reopened.snapshot(), expected);
    assert_eq!(reopened.len(), 4);
}

#[test]
fn test_reopen_with_smaller_capacity_keeps_newest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    {
        let mut buffer = SampleBuffer::open(&path, 5).unwrap();
        for v in [0.1, 0.2, 0.3, 0.4] {
            buffer.append(Score(v)).unwrap();
        }
    }

    let buffer = SampleBuffer::<Score>::open(&path, 2).unwrap();
    assert_eq!(buffer.snapshot(), vec![Score(0.3), Score(0.4)]);
}

#[test]
fn test_clear_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    let mut buffer = SampleBuffer::open(&path, 3).unwrap();
    buffer.append(Score(0.1)).unwrap();
    assert!(path.exists());

    buffer.clear().unwrap();
    assert!(buffer.is_empty());
    assert!(!path.exists());

    // Clearing again is not an error
    buffer.clear().unwrap();
}

#[test]
fn test_snapshot_is_detached() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = SampleBuffer::open(dir.path().join("pred.csv"), 3).unwrap();
    buffer.append(Score(0.1)).unwrap();

    let snapshot = buffer.snapshot();
    buffer.append(Score(0.2)).unwrap();
    buffer.clear().unwrap();

    assert_eq!(snapshot, vec![Score(0.1)]);
}

#[test]
fn test_schema_mismatch_leaves_buffer_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let mut buffer = SampleBuffer::open(&path, 3).unwrap();
    buffer.append(row(1.0)).unwrap();

    let err = buffer.append(FeatureRow::new().with("other", 1.0)).unwrap_err();
    assert!(matches!(err, BufferError::SchemaMismatch { .. }));
    assert_eq!(buffer.len(), 1);

    let reopened = SampleBuffer::<FeatureRow>::open(&path, 3).unwrap();
    assert_eq!(reopened.snapshot(), vec![row(1.0)]);
}

#[test]
fn test_write_failure_leaves_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    let mut buffer = SampleBuffer::open(sub.join("pred.csv"), 3).unwrap();
    buffer.append(Score(0.1)).unwrap();

    std::fs::remove_dir_all(&sub).unwrap();
    let err = buffer.append(Score(0.2)).unwrap_err();
    assert!(matches!(err, BufferError::Csv { .. } | BufferError::Io { .. }));
    assert_eq!(buffer.snapshot(), vec![Score(0.1)]);
}

#[test]
fn test_corrupt_file_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    std::fs::write(&path, "proba\n0.1\nnot-a-number\n").unwrap();

    let err = SampleBuffer::<Score>::open(&path, 3).unwrap_err();
    match err {
        BufferError::Corrupt { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_undo_push_restores_evicted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pred.csv");
    let mut buffer = SampleBuffer::open(&path, 2).unwrap();
    buffer.append(Score(0.1)).unwrap();
    buffer.append(Score(0.2)).unwrap();

    let (status, evicted) = buffer.push(Score(0.3)).unwrap();
    assert!(status.is_full());
    assert_eq!(evicted, Some(Score(0.1)));

    buffer.undo_push(evicted).unwrap();
    assert_eq!(buffer.snapshot(), vec![Score(0.1), Score(0.2)]);
    let reopened = SampleBuffer::<Score>::open(&path, 2).unwrap();
    assert_eq!(reopened.snapshot(), vec![Score(0.1), Score(0.2)]);
}

#[test]
fn test_categorical_with_comma_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let record = FeatureRow::new().with("city", "Paris, FR").with("age", 41.0);
    {
        let mut buffer = SampleBuffer::open(&path, 2).unwrap();
        buffer.append(record.clone()).unwrap();
    }
    let buffer = SampleBuffer::<FeatureRow>::open(&path, 2).unwrap();
    assert_eq!(buffer.snapshot(), vec![record]);
}

#[test]
fn test_ambiguous_categories_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let record = FeatureRow::new()
        .with("zip", "02139")
        .with("code", " x ")
        .with("note", "")
        .with("radius", 14.5)
        .with("texture", None::<f64>);
    {
        let mut buffer = SampleBuffer::open(&path, 3).unwrap();
        buffer.append(record.clone()).unwrap();
    }

    let buffer = SampleBuffer::<FeatureRow>::open(&path, 3).unwrap();
    assert_eq!(buffer.snapshot(), vec![record]);
}

#[test]
fn test_empty_record_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let mut buffer = SampleBuffer::open(&path, 3).unwrap();

    let err = buffer.append(FeatureRow::new()).unwrap_err();
    assert!(matches!(err, BufferError::EmptyRecord));
    assert!(buffer.is_empty());
    assert!(!path.exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_window_is_last_min_n_c(
        values in proptest::collection::vec(-1000.0f64..1000.0, 0..40),
        capacity in 1usize..10,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = SampleBuffer::open(dir.path().join("pred.csv"), capacity).unwrap();
        for v in &values {
            buffer.append(Score(*v)).unwrap();
        }

        let keep = values.len().min(capacity);
        let expected: Vec<Score> = values[values.len() - keep..].iter().copied().map(Score).collect();
        prop_assert_eq!(buffer.len(), keep);
        prop_assert_eq!(buffer.snapshot(), expected);
    }

    #[test]
    fn prop_reopen_matches_snapshot(
        values in proptest::collection::vec(-1000.0f64..1000.0, 1..20),
        capacity in 1usize..8,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pred.csv");
        let mut buffer = SampleBuffer::open(&path, capacity).unwrap();
        for v in &values {
            buffer.append(Score(*v)).unwrap();
        }

        let reopened = SampleBuffer::<Score>::open(&path, capacity).unwrap();
        prop_assert_eq!(reopened.snapshot(), buffer.snapshot());
    }
}
