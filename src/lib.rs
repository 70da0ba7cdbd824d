#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Profile Provisioner
//!
//! Concurrent provisioning of synthetic user profiles with bounded lifecycle
//! control and salted credential handling.
//!
//! ## Overview
//!
//! A run sizes a worker pool to `worker_count` and submits exactly one
//! provisioning task per worker. Each task asks an [`AutomationEngine`] for a
//! profile draft, hashes a password under a fresh salt into a
//! [`ProfileRecord`], and saves it through a [`ProfileStore`]. The orchestrator
//! waits up to the shutdown timeout, then force-cancels whatever is left.
//!
//! ## Module Organization
//!
//! - [`orchestration`] - orchestrator, state machine and provisioning task
//! - [`credentials`] - salt generation, hashing, verification, password generation
//! - [`models`] - seeds, drafts, records, outcomes and run reports
//! - [`automation`] - automation engine contract and the synthetic engine
//! - [`store`] - profile store contract with in-memory and Postgres backends
//! - [`events`] - observation events and sinks
//! - [`config`] - layered TOML/environment configuration
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - crate-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use profile_provisioner::automation::{SeedGenerator, SyntheticEngine};
//! use profile_provisioner::config::ConfigManager;
//! use profile_provisioner::events::TracingEventSink;
//! use profile_provisioner::orchestration::Orchestrator;
//! use profile_provisioner::store::InMemoryProfileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let config = manager.config();
//!
//! let mut orchestrator = Orchestrator::new(
//!     config.pool.to_pool_config(),
//!     Arc::new(SyntheticEngine::new(config.automation.clone())),
//!     Arc::new(InMemoryProfileStore::new()),
//!     Arc::new(TracingEventSink),
//!     SeedGenerator::new(config.automation.email_domain.clone()),
//! )?;
//!
//! let report = orchestrator.run().await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod automation;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod store;

pub use automation::{AutomationEngine, AutomationError, SeedGenerator, SyntheticEngine};
pub use config::{ConfigManager, ConfigurationError, PoolConfig, ProvisionerConfig};
pub use credentials::{CredentialHasher, PasswordDigest, Salt};
pub use error::{ProvisionerError, Result};
pub use events::{EventSink, ProvisioningEvent};
pub use models::{ProfileDraft, ProfileId, ProfileRecord, ProfileSeed, RunReport, TaskOutcome};
pub use orchestration::{Orchestrator, OrchestratorError, OrchestratorState, ProvisioningTask};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
