//! Property-based tests for configuration validation

use super::error::ConfigError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn config_in(root: &std::path::Path, buffer_size: usize, timeout: u64) -> MonitorConfig {
    let reference = root.join("train_data.csv");
    std::fs::write(&reference, "a,proba\n1,0.5\n").unwrap();
    MonitorConfig {
        model: ModelSection { name: "model".to_string() },
        drift: DriftSection {
            path: root.join("buffers"),
            report_path: None,
            buffer_size,
            reference_path: reference,
            evaluation_timeout_secs: timeout,
            save_retries: 0,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_positive_values_pass(buffer_size in 1usize..10_000, timeout in 1u64..3600) {
        let dir = tempfile::tempdir().unwrap();
        prop_assert!(validate_config(&config_in(dir.path(), buffer_size, timeout)).is_ok());
    }

    #[test]
    fn prop_zero_buffer_size_fails(timeout in 0u64..3600) {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_config(&config_in(dir.path(), 0, timeout));
        prop_assert!(matches!(result, Err(ConfigError::InvalidBufferSize(0))));
    }

    #[test]
    fn prop_settings_follow_section(timeout in 1u64..3600, retries in 0u32..10) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), 10, timeout);
        config.drift.save_retries = retries;
        let settings = config.drift.settings();
        prop_assert_eq!(settings.evaluation_timeout.as_secs(), timeout);
        prop_assert_eq!(settings.save_retries, retries);
    }
}
