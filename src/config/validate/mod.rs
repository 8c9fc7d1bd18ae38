//! Configuration validation
//!
//! Validates monitoring configurations once, at startup.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ConfigError;
pub use validator::validate_config;
