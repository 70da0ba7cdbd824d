//! # Provisioning Task
//!
//! One unit of work owned by exactly one pool worker. The task runs the
//! automation attempt under its own timeout, hashes the password into a
//! [`ProfileRecord`], and makes at most one store write. Every failure is
//! folded into the returned [`TaskOutcome`]; nothing escapes as an error.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::automation::{AutomationEngine, AutomationError};
use crate::credentials::CredentialHasher;
use crate::events::{EventSink, ProvisioningEvent};
use crate::models::{ProfileDraft, ProfileRecord, ProfileSeed, TaskOutcome};
use crate::store::ProfileStore;

pub struct ProvisioningTask {
    index: usize,
    run_id: Uuid,
    seed: ProfileSeed,
    engine: Arc<dyn AutomationEngine>,
    store: Arc<dyn ProfileStore>,
    events: Arc<dyn EventSink>,
    hasher: CredentialHasher,
    per_task_timeout: Duration,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ProvisioningTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningTask")
            .field("index", &self.index)
            .field("run_id", &self.run_id)
            .field("engine", &self.engine.name())
            .field("store", &self.store.name())
            .field("per_task_timeout", &self.per_task_timeout)
            .finish()
    }
}

impl ProvisioningTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: usize,
        run_id: Uuid,
        seed: ProfileSeed,
        engine: Arc<dyn AutomationEngine>,
        store: Arc<dyn ProfileStore>,
        events: Arc<dyn EventSink>,
        per_task_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            index,
            run_id,
            seed,
            engine,
            store,
            events,
            hasher: CredentialHasher::new(),
            per_task_timeout,
            cancel,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Run to a terminal outcome and emit exactly one event for it
    #[instrument(skip_all, fields(run_id = %self.run_id, task_index = self.index))]
    pub async fn execute(self) -> TaskOutcome {
        let outcome = self.provision().await;
        self.events.emit(self.terminal_event(&outcome));
        outcome
    }

    async fn provision(&self) -> TaskOutcome {
        let draft = match self.attempt_automation().await {
            Ok(draft) => draft,
            Err(error) => return TaskOutcome::automation_failed(error.reason()),
        };

        let record = match self.build_record(&draft) {
            Ok(record) => record,
            Err(error) => return TaskOutcome::automation_failed(error.reason()),
        };

        let email = record.email().to_string();
        match self.store.save(record.clone()).await {
            Ok(profile_id) => TaskOutcome::Succeeded { record, profile_id },
            Err(error) => TaskOutcome::StoreFailed {
                email,
                reason: error.reason(),
            },
        }
    }

    async fn attempt_automation(&self) -> Result<ProfileDraft, AutomationError> {
        debug!(engine = self.engine.name(), "Starting automation attempt");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AutomationError::Cancelled),
            attempt = tokio::time::timeout(self.per_task_timeout, self.engine.attempt(&self.seed)) => {
                match attempt {
                    Ok(result) => result,
                    Err(_) => Err(AutomationError::Timeout {
                        timeout_seconds: self.per_task_timeout.as_secs(),
                    }),
                }
            }
        }
    }

    fn build_record(&self, draft: &ProfileDraft) -> Result<ProfileRecord, AutomationError> {
        let raw_password = match draft.raw_password.as_deref() {
            Some(supplied) if !supplied.is_empty() => supplied.to_string(),
            _ => self.hasher.generate_secure_password(),
        };

        ProfileRecord::from_draft(&self.seed, draft, &raw_password, &self.hasher).map_err(
            |missing| AutomationError::IncompleteDraft {
                field: missing.to_string(),
            },
        )
    }

    fn terminal_event(&self, outcome: &TaskOutcome) -> ProvisioningEvent {
        match outcome {
            TaskOutcome::Succeeded { record, profile_id } => ProvisioningEvent::TaskSucceeded {
                run_id: self.run_id,
                task_index: self.index,
                email: record.email().to_string(),
                profile_id: *profile_id,
            },
            TaskOutcome::AutomationFailed { reason } => ProvisioningEvent::TaskAutomationFailed {
                run_id: self.run_id,
                task_index: self.index,
                reason: reason.clone(),
            },
            TaskOutcome::StoreFailed { email, reason } => ProvisioningEvent::TaskStoreFailed {
                run_id: self.run_id,
                task_index: self.index,
                email: email.clone(),
                reason: reason.clone(),
            },
        }
    }
}
