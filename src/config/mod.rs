//! Monitoring configuration
//!
//! A single YAML file describes the served model and where its drift
//! buffers, reference data and reports live:
//!
//! ```yaml
//! model:
//!   name: logistic_regression
//! drift:
//!   path: .drift
//!   buffer_size: 100
//!   reference_path: artifacts/train_data.csv
//! ```

mod cli;
mod schema;
mod validate;

use std::fs;
use std::path::Path;

pub use cli::{parse_args, CheckArgs, Cli, Command, OutputFormat, StatusArgs, ValidateArgs};
pub use schema::{DriftSection, ModelSection, MonitorConfig};
pub use validate::{validate_config, ConfigError};

/// Load and parse a YAML configuration file without validating it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&yaml)
        .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
}

impl MonitorConfig {
    /// Load, parse and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }
}
