//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Delivery thread name must not be empty")]
    EmptyThreadName,

    #[error("Delivery thread name must not contain NUL bytes")]
    InvalidThreadName,

    #[error("Log level must not be empty")]
    EmptyLogLevel,
}
