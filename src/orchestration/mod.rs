//! # Orchestration
//!
//! The concurrent core: a single-use [`Orchestrator`] sizes a pool to
//! `worker_count`, submits one [`ProvisioningTask`] per worker and waits up to
//! the shutdown timeout for all of them to report.
//!
//! ## Lifecycle
//!
//! `Idle → Running → (Terminated | ForcedShutdown)`. When the shutdown timeout
//! elapses or the caller's interrupt future completes, every outstanding task
//! is cancelled and aborted; tasks that never reported are counted as
//! `AutomationFailed("forced-shutdown")` and the report is flagged `forced`.
//! Interruption is then surfaced to the caller as
//! [`OrchestratorError::Interrupted`].
//!
//! ## Failure Isolation
//!
//! Each task runs in its own spawned future. Automation errors, store errors
//! and panics are contained to that task and still produce exactly one counted
//! outcome.

pub mod orchestrator;
pub mod state;
pub mod task;

pub use orchestrator::{Orchestrator, OrchestratorError};
pub use state::OrchestratorState;
pub use task::ProvisioningTask;
