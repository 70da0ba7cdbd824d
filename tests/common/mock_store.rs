use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use profile_provisioner::models::{ProfileId, ProfileRecord};
use profile_provisioner::store::{InMemoryProfileStore, ProfileStore, StoreError};

/// In-memory store that fails the save calls whose (zero-based) index is listed
#[derive(Debug, Default)]
pub struct FlakyStore {
    fail_on: HashSet<usize>,
    calls: AtomicUsize,
    inner: InMemoryProfileStore,
}

impl FlakyStore {
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: calls.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn always_failing(max_calls: usize) -> Self {
        Self::failing_on(0..max_calls)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> &InMemoryProfileStore {
        &self.inner
    }
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn save(&self, record: ProfileRecord) -> Result<ProfileId, StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(StoreError::Unavailable(format!(
                "simulated outage on save {call}"
            )));
        }
        self.inner.save(record).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}
