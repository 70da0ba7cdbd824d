use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::state::OrchestratorState;
use super::task::ProvisioningTask;
use crate::automation::{AutomationEngine, SeedGenerator};
use crate::config::PoolConfig;
use crate::constants::reasons;
use crate::events::{EventSink, ProvisioningEvent};
use crate::models::{RunReport, TaskOutcome};
use crate::store::ProfileStore;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestratorError {
    #[error("orchestrator is single-use and is already {state}")]
    AlreadyStarted { state: OrchestratorState },

    #[error("run interrupted while waiting for the pool ({report})")]
    Interrupted { report: RunReport },

    #[error("invalid pool configuration: {0}")]
    InvalidPool(String),

    #[error("illegal orchestrator transition from {from} to {to}")]
    InvalidTransition {
        from: OrchestratorState,
        to: OrchestratorState,
    },
}

enum StopReason {
    ShutdownTimeout,
    Interrupted,
}

/// Runs a fixed pool of provisioning tasks and aggregates their outcomes.
///
/// An orchestrator drives exactly one run. The pool is sized to
/// `worker_count` and receives exactly that many tasks; no task is submitted
/// after the wait begins.
pub struct Orchestrator {
    pool: PoolConfig,
    engine: Arc<dyn AutomationEngine>,
    store: Arc<dyn ProfileStore>,
    events: Arc<dyn EventSink>,
    seeds: SeedGenerator,
    state: OrchestratorState,
    run_id: Uuid,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("pool", &self.pool)
            .field("engine", &self.engine.name())
            .field("store", &self.store.name())
            .field("state", &self.state)
            .field("run_id", &self.run_id)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(
        pool: PoolConfig,
        engine: Arc<dyn AutomationEngine>,
        store: Arc<dyn ProfileStore>,
        events: Arc<dyn EventSink>,
        seeds: SeedGenerator,
    ) -> Result<Self, OrchestratorError> {
        pool.validate()
            .map_err(|e| OrchestratorError::InvalidPool(e.to_string()))?;

        Ok(Self {
            pool,
            engine,
            store,
            events,
            seeds,
            state: OrchestratorState::Idle,
            run_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
        })
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool
    }

    /// Run to completion or forced shutdown with no external interruption
    pub async fn run(&mut self) -> Result<RunReport, OrchestratorError> {
        self.run_until(futures::future::pending::<()>()).await
    }

    /// Run the pool, treating completion of `interrupt` as an external
    /// cancellation signal.
    ///
    /// Interruption forces shutdown exactly like the shutdown timeout does,
    /// then returns [`OrchestratorError::Interrupted`] carrying the report.
    #[instrument(skip_all, fields(run_id = %self.run_id, worker_count = self.pool.worker_count))]
    pub async fn run_until<F>(&mut self, interrupt: F) -> Result<RunReport, OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        let current = self.state;
        self.transition(OrchestratorState::Running)
            .map_err(|_| OrchestratorError::AlreadyStarted { state: current })?;

        debug!(
            run_id = %self.run_id,
            worker_count = self.pool.worker_count,
            engine = self.engine.name(),
            store = self.store.name(),
            "🚀 ORCHESTRATOR: Starting provisioning run"
        );
        self.events.emit(ProvisioningEvent::RunStarted {
            run_id: self.run_id,
            worker_count: self.pool.worker_count,
        });

        let (mut pool, mut pending) = self.submit_tasks();
        let mut report = RunReport::default();

        let deadline = Instant::now().checked_add(self.pool.shutdown_timeout);
        let shutdown_timer = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                // Beyond the clock's range: the timeout can never fire
                None => futures::future::pending::<()>().await,
            }
        };
        tokio::pin!(shutdown_timer);
        tokio::pin!(interrupt);

        let stop = loop {
            tokio::select! {
                biased;
                joined = pool.join_next_with_id() => match joined {
                    Some(joined) => {
                        let outcome = self.resolve(joined, &mut pending);
                        report.record(&outcome);
                    }
                    None => break None,
                },
                _ = &mut shutdown_timer => break Some(StopReason::ShutdownTimeout),
                _ = &mut interrupt => break Some(StopReason::Interrupted),
            }
        };

        let Some(reason) = stop else {
            self.transition(OrchestratorState::Terminated)?;
            info!(run_id = %self.run_id, %report, "✅ ORCHESTRATOR: All tasks reported before shutdown timeout");
            self.events.emit(ProvisioningEvent::RunTerminated {
                run_id: self.run_id,
                report,
            });
            return Ok(report);
        };

        let abandoned = self
            .force_shutdown(&mut pool, &mut pending, &mut report)
            .await;
        self.transition(OrchestratorState::ForcedShutdown)?;
        self.events.emit(ProvisioningEvent::RunForcedShutdown {
            run_id: self.run_id,
            abandoned,
            report,
        });

        match reason {
            StopReason::ShutdownTimeout => Ok(report),
            StopReason::Interrupted => {
                warn!(run_id = %self.run_id, %report, "⚠️ ORCHESTRATOR: Run interrupted");
                self.events.emit(ProvisioningEvent::RunInterrupted {
                    run_id: self.run_id,
                    report,
                });
                Err(OrchestratorError::Interrupted { report })
            }
        }
    }

    fn transition(&mut self, next: OrchestratorState) -> Result<(), OrchestratorError> {
        if !self.state.can_transition_to(next) {
            return Err(OrchestratorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(run_id = %self.run_id, from = %self.state, to = %next, "Orchestrator state transition");
        self.state = next;
        Ok(())
    }

    fn submit_tasks(&self) -> (JoinSet<TaskOutcome>, HashMap<Id, usize>) {
        let mut pool = JoinSet::new();
        let mut pending = HashMap::with_capacity(self.pool.worker_count);

        for index in 0..self.pool.worker_count {
            let task = ProvisioningTask::new(
                index,
                self.run_id,
                self.seeds.generate(),
                Arc::clone(&self.engine),
                Arc::clone(&self.store),
                Arc::clone(&self.events),
                self.pool.per_task_timeout,
                self.cancel.child_token(),
            );
            let handle = pool.spawn(task.execute());
            pending.insert(handle.id(), index);
        }

        debug!(
            run_id = %self.run_id,
            submitted = pending.len(),
            "Task submission closed"
        );
        (pool, pending)
    }

    /// Signal every running task, abort the pool and count what never reported.
    ///
    /// Returns the number of tasks recorded as forced-shutdown.
    async fn force_shutdown(
        &self,
        pool: &mut JoinSet<TaskOutcome>,
        pending: &mut HashMap<Id, usize>,
        report: &mut RunReport,
    ) -> usize {
        warn!(
            run_id = %self.run_id,
            outstanding = pending.len(),
            "⚠️ ORCHESTRATOR: Forcing shutdown of outstanding tasks"
        );

        self.cancel.cancel();
        pool.abort_all();

        let mut abandoned = 0;
        while let Some(joined) = pool.join_next_with_id().await {
            let outcome = self.resolve(joined, pending);
            if matches!(&outcome, TaskOutcome::AutomationFailed { reason } if reason == reasons::FORCED_SHUTDOWN)
            {
                abandoned += 1;
            }
            report.record(&outcome);
        }

        report.forced = true;
        abandoned
    }

    /// Turn a joined task into its outcome.
    ///
    /// Tasks that report themselves have already emitted their event; tasks
    /// that were aborted or panicked get one emitted here.
    fn resolve(
        &self,
        joined: Result<(Id, TaskOutcome), JoinError>,
        pending: &mut HashMap<Id, usize>,
    ) -> TaskOutcome {
        match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                outcome
            }
            Err(error) => {
                let task_index = pending.remove(&error.id()).unwrap_or_default();
                let reason = if error.is_panic() {
                    format!(
                        "{}: {}",
                        reasons::TASK_PANICKED,
                        panic_message(error.into_panic())
                    )
                } else {
                    reasons::FORCED_SHUTDOWN.to_string()
                };

                self.events.emit(ProvisioningEvent::TaskAutomationFailed {
                    run_id: self.run_id,
                    task_index,
                    reason: reason.clone(),
                });
                TaskOutcome::automation_failed(reason)
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
