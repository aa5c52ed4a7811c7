//! Configuration Error Types
//!
//! Errors raised while loading and validating engine configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Layered sources could not be read or merged
    #[error("Failed to load configuration from {}: {error}", .config_directory.display())]
    LoadError {
        config_directory: PathBuf,
        error: String,
    },

    /// Merged sources did not deserialize into an engine configuration
    #[error("Failed to deserialize configuration for environment '{environment}': {error}")]
    DeserializeError { environment: String, error: String },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    /// Create a load error for a configuration directory
    pub fn load_error<E: std::fmt::Display>(config_directory: PathBuf, error: E) -> Self {
        Self::LoadError {
            config_directory,
            error: error.to_string(),
        }
    }

    /// Create a deserialization error
    pub fn deserialize_error<N: Into<String>, E: std::fmt::Display>(
        environment: N,
        error: E,
    ) -> Self {
        Self::DeserializeError {
            environment: environment.into(),
            error: error.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F: Into<String>, V: Into<String>, C: Into<String>>(
        field: F,
        value: V,
        context: C,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
