//! Terminal results of provisioning tasks and their per-run aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::{ProfileId, ProfileRecord};

/// Tagged terminal result of one provisioning attempt
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// Record built and persisted under the returned id
    Succeeded {
        record: ProfileRecord,
        profile_id: ProfileId,
    },
    /// No record was ever built
    AutomationFailed { reason: String },
    /// A valid record was built but could not be persisted
    StoreFailed { email: String, reason: String },
}

impl TaskOutcome {
    pub fn automation_failed(reason: impl Into<String>) -> Self {
        Self::AutomationFailed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded { .. } => "succeeded",
            Self::AutomationFailed { .. } => "automation_failed",
            Self::StoreFailed { .. } => "store_failed",
        }
    }
}

/// Order-independent counts for one orchestrator run.
///
/// `forced` distinguishes "every task finished" from "we stopped waiting".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub succeeded: usize,
    pub automation_failed: usize,
    pub store_failed: usize,
    pub forced: bool,
}

impl RunReport {
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Succeeded { .. } => self.succeeded += 1,
            TaskOutcome::AutomationFailed { .. } => self.automation_failed += 1,
            TaskOutcome::StoreFailed { .. } => self.store_failed += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.automation_failed + self.store_failed
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded={} automation_failed={} store_failed={} forced={}",
            self.succeeded, self.automation_failed, self.store_failed, self.forced
        )
    }
}
