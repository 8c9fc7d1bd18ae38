//! Centinela: online drift monitoring for served classifiers
//!
//! Watches production traffic of a binary classifier for statistical drift
//! against its training data without slowing down individual predictions.
//!
//! - [`monitor`]: durable sample buffers, paired drift state, the background
//!   drift check orchestrator and report stores
//! - [`eval`]: drift evaluation engines and statistical tests
//! - [`serving`]: prediction service and application context
//! - [`config`]: YAML configuration and CLI arguments
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use centinela::config::MonitorConfig;
//! use centinela::monitor::FeatureRow;
//! use centinela::serving::{Classifier, MonitoringContext, PredictionService, ServingError};
//!
//! let config = MonitorConfig::load("config.yaml")?;
//! let context = MonitoringContext::from_config(config)?;
//! let model: Arc<dyn Classifier> =
//!     Arc::new(|_: &FeatureRow| -> Result<[f64; 2], ServingError> { Ok([0.3, 0.7]) });
//! let service = PredictionService::new(model).with_monitor(Arc::clone(context.monitor()));
//!
//! let responses = service.predict(&[FeatureRow::new().with("mean_radius", 14.2).into()])?;
//! println!("{}", responses[0].label);
//! context.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod monitor;
pub mod serving;

pub use error::{Error, Result};
