//! Configuration Error Types
//!
//! Every variant is fatal at startup: the process aborts before the worker
//! pool is created.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Configuration directory does not exist
    #[error("Configuration directory not found: {path}")]
    ConfigDirectoryNotFound { path: PathBuf },

    /// Underlying source could not be read or deserialized
    #[error("Failed to load configuration for environment '{environment}': {error}")]
    LoadFailed { environment: String, error: String },

    /// Missing required configuration field
    #[error("Missing required configuration field '{field}' in {context}")]
    MissingRequiredField { field: String, context: String },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    pub fn config_directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigDirectoryNotFound { path: path.into() }
    }

    pub fn load_failed(environment: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::LoadFailed {
            environment: environment.into(),
            error: error.to_string(),
        }
    }

    pub fn missing_required_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
