#![allow(dead_code)]

pub mod mock_engine;
pub mod mock_store;
pub mod strategies;

pub use mock_engine::*;
pub use mock_store::*;
pub use strategies::*;

use std::sync::Arc;
use std::time::Duration;

use profile_provisioner::automation::{AutomationEngine, SeedGenerator};
use profile_provisioner::config::PoolConfig;
use profile_provisioner::events::{EventPublisher, EventSink, ProvisioningEvent};
use profile_provisioner::orchestration::Orchestrator;
use profile_provisioner::store::ProfileStore;

pub fn pool_config(worker_count: usize, per_task_secs: u64, shutdown_secs: u64) -> PoolConfig {
    PoolConfig {
        worker_count,
        per_task_timeout: Duration::from_secs(per_task_secs),
        shutdown_timeout: Duration::from_secs(shutdown_secs),
    }
}

pub fn build_orchestrator(
    pool: PoolConfig,
    engine: Arc<dyn AutomationEngine>,
    store: Arc<dyn ProfileStore>,
    events: Arc<dyn EventSink>,
) -> Orchestrator {
    Orchestrator::new(pool, engine, store, events, SeedGenerator::new("example.com"))
        .expect("valid pool configuration")
}

/// Everything already published to `receiver`, in order
pub fn drain_events(
    receiver: &mut tokio::sync::broadcast::Receiver<profile_provisioner::events::PublishedEvent>,
) -> Vec<ProvisioningEvent> {
    let mut events = Vec::new();
    while let Ok(published) = receiver.try_recv() {
        events.push(published.event);
    }
    events
}

pub fn publisher() -> Arc<EventPublisher> {
    Arc::new(EventPublisher::new(4096))
}
