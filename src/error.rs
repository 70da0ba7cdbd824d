//! Error types for the provisioner.
//!
//! Task-level failures never surface here: they are folded into
//! [`TaskOutcome`](crate::models::TaskOutcome) values by the provisioning task.
//! Only configuration failures, store setup and interruption are expected to
//! unwind past the orchestrator, so those are the variants callers usually
//! match on. [`store::from_config`](crate::store::from_config) returns this type.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::orchestration::OrchestratorError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProvisionerError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Orchestration error: {0}")]
    Orchestration(String),
    #[error("Interrupted: {0}")]
    Interrupted(String),
}

impl From<ConfigurationError> for ProvisionerError {
    fn from(error: ConfigurationError) -> Self {
        ProvisionerError::Configuration(error.to_string())
    }
}

impl From<StoreError> for ProvisionerError {
    fn from(error: StoreError) -> Self {
        ProvisionerError::Store(error.to_string())
    }
}

impl From<OrchestratorError> for ProvisionerError {
    fn from(error: OrchestratorError) -> Self {
        match error {
            OrchestratorError::Interrupted { .. } => {
                ProvisionerError::Interrupted(error.to_string())
            }
            other => ProvisionerError::Orchestration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionerError>;
