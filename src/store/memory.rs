use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use super::{ProfileStore, StoreError};
use crate::models::{ProfileId, ProfileRecord};

/// A record as held by the in-memory store
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub id: ProfileId,
    pub record: ProfileRecord,
    pub created_at: DateTime<Utc>,
}

/// Concurrent in-memory store keyed by email.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<String, StoredProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, email: &str) -> Option<StoredProfile> {
        self.profiles.get(email).map(|entry| entry.value().clone())
    }

    pub fn emails(&self) -> Vec<String> {
        self.profiles.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn save(&self, record: ProfileRecord) -> Result<ProfileId, StoreError> {
        match self.profiles.entry(record.email().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateEmail {
                email: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let id = ProfileId::new_v4();
                debug!(profile_id = %id, email = %record.email(), "Profile stored in memory");
                entry.insert(StoredProfile {
                    id,
                    record,
                    created_at: Utc::now(),
                });
                Ok(id)
            }
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
