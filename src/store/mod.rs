//! # Profile Store Capability
//!
//! Persists [`ProfileRecord`]s and assigns each one a [`ProfileId`] and a
//! creation timestamp. The store is the only state shared between tasks and
//! owns its own concurrency safety; callers add no locking around it.
//!
//! - [`memory`] - concurrent in-memory store
//! - [`postgres`] - `sqlx` Postgres store (feature `postgres`)

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ProvisionerConfig, StoreBackend};
#[cfg(not(feature = "postgres"))]
use crate::error::ProvisionerError;
use crate::models::{ProfileId, ProfileRecord};

pub use memory::InMemoryProfileStore;
#[cfg(feature = "postgres")]
pub use postgres::PgProfileStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {operation}: {message}")]
    Query { operation: String, message: String },

    #[error("a profile with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Text recorded in `TaskOutcome::StoreFailed`
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist `record`; ownership moves into the store.
    async fn save(&self, record: ProfileRecord) -> Result<ProfileId, StoreError>;

    /// Store name for logs
    fn name(&self) -> &str;
}

/// Build the store selected by `store.backend`, connecting when it is Postgres
pub async fn from_config(config: &ProvisionerConfig) -> crate::Result<Arc<dyn ProfileStore>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryProfileStore::new())),
        #[cfg(feature = "postgres")]
        StoreBackend::Postgres => {
            let store = PgProfileStore::connect(&config.database).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StoreBackend::Postgres => Err(ProvisionerError::Configuration(
            "store.backend = postgres requires the `postgres` feature".to_string(),
        )),
    }
}
