//! # Automation Engine Capability
//!
//! The provisioning task only knows the [`AutomationEngine`] contract: given a
//! [`ProfileSeed`], produce a [`ProfileDraft`] or an [`AutomationError`]. The
//! caller applies its own timeout and may drop the attempt future at any await
//! point, so engines must hold session resources in guards that release on drop.
//!
//! - [`seed`] - random name/email seeds for each attempt
//! - [`synthetic`] - local, network-free engine used for dry runs and staging

pub mod seed;
pub mod synthetic;

use async_trait::async_trait;
use thiserror::Error;

use crate::constants::reasons;
use crate::models::{ProfileDraft, ProfileSeed};

pub use seed::SeedGenerator;
pub use synthetic::SyntheticEngine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomationError {
    #[error("timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("unexpected page state: {0}")]
    UnexpectedPageState(String),

    #[error("incomplete draft: missing {field}")]
    IncompleteDraft { field: String },

    #[error("{}", reasons::FORCED_SHUTDOWN)]
    Cancelled,

    #[error("engine error: {0}")]
    Engine(String),
}

impl AutomationError {
    /// Text recorded in `TaskOutcome::AutomationFailed`
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[async_trait]
pub trait AutomationEngine: Send + Sync {
    /// Drive one provisioning attempt for `seed`
    async fn attempt(&self, seed: &ProfileSeed) -> Result<ProfileDraft, AutomationError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons() {
        assert_eq!(
            AutomationError::Timeout { timeout_seconds: 30 }.reason(),
            "timed out after 30s"
        );
        assert_eq!(AutomationError::Cancelled.reason(), "forced-shutdown");
        assert_eq!(
            AutomationError::IncompleteDraft {
                field: "email".to_string()
            }
            .reason(),
            "incomplete draft: missing email"
        );
    }
}
