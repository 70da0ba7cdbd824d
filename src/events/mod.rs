//! # Observation Events
//!
//! The orchestrator and its tasks report every state transition as a
//! [`ProvisioningEvent`] to an injected [`EventSink`]. Sink choice (tracing
//! output, broadcast fan-out, both) is the caller's; the core never reaches
//! for a global logger.

pub mod publisher;
pub mod sinks;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::events;
use crate::models::{ProfileId, RunReport};

pub use publisher::{write_json_lines, EventPublisher, PublishedEvent};
pub use sinks::{CompositeEventSink, TracingEventSink};

/// One state transition of a run or of a task within it.
///
/// No variant carries a password, digest or salt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ProvisioningEvent {
    RunStarted {
        run_id: Uuid,
        worker_count: usize,
    },
    TaskSucceeded {
        run_id: Uuid,
        task_index: usize,
        email: String,
        profile_id: ProfileId,
    },
    TaskAutomationFailed {
        run_id: Uuid,
        task_index: usize,
        reason: String,
    },
    TaskStoreFailed {
        run_id: Uuid,
        task_index: usize,
        email: String,
        reason: String,
    },
    RunTerminated {
        run_id: Uuid,
        report: RunReport,
    },
    RunForcedShutdown {
        run_id: Uuid,
        /// Tasks that had not reported when the pool was force-cancelled
        abandoned: usize,
        report: RunReport,
    },
    RunInterrupted {
        run_id: Uuid,
        report: RunReport,
    },
}

impl ProvisioningEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => events::RUN_STARTED,
            Self::TaskSucceeded { .. } => events::TASK_SUCCEEDED,
            Self::TaskAutomationFailed { .. } => events::TASK_AUTOMATION_FAILED,
            Self::TaskStoreFailed { .. } => events::TASK_STORE_FAILED,
            Self::RunTerminated { .. } => events::RUN_TERMINATED,
            Self::RunForcedShutdown { .. } => events::RUN_FORCED_SHUTDOWN,
            Self::RunInterrupted { .. } => events::RUN_INTERRUPTED,
        }
    }

    /// True for the three per-task terminal events
    pub fn is_task_terminal(&self) -> bool {
        matches!(
            self,
            Self::TaskSucceeded { .. }
                | Self::TaskAutomationFailed { .. }
                | Self::TaskStoreFailed { .. }
        )
    }
}

/// Destination for observation events.
///
/// Implementations must not block: tasks emit from inside the worker pool.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ProvisioningEvent);
}
