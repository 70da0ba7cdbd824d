use std::sync::Arc;
use tracing::{error, info, warn};

use super::{EventSink, ProvisioningEvent};

/// Writes each event as one structured `tracing` record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: ProvisioningEvent) {
        let name = event.name();
        match event {
            ProvisioningEvent::RunStarted {
                run_id,
                worker_count,
            } => {
                info!(event = name, %run_id, worker_count, "🚀 RUN: started");
            }
            ProvisioningEvent::TaskSucceeded {
                run_id,
                task_index,
                email,
                profile_id,
            } => {
                info!(event = name, %run_id, task_index, %email, %profile_id, "👤 TASK: profile provisioned");
            }
            ProvisioningEvent::TaskAutomationFailed {
                run_id,
                task_index,
                reason,
            } => {
                warn!(event = name, %run_id, task_index, %reason, "⚠️ TASK: automation failed");
            }
            ProvisioningEvent::TaskStoreFailed {
                run_id,
                task_index,
                email,
                reason,
            } => {
                error!(event = name, %run_id, task_index, %email, %reason, "❌ TASK: store failed");
            }
            ProvisioningEvent::RunTerminated { run_id, report } => {
                info!(
                    event = name,
                    %run_id,
                    succeeded = report.succeeded,
                    failed = report.failed(),
                    automation_failed = report.automation_failed,
                    store_failed = report.store_failed,
                    "✅ RUN: terminated"
                );
            }
            ProvisioningEvent::RunForcedShutdown {
                run_id,
                abandoned,
                report,
            } => {
                warn!(
                    event = name,
                    %run_id,
                    abandoned,
                    succeeded = report.succeeded,
                    failed = report.failed(),
                    "🛑 RUN: forced shutdown"
                );
            }
            ProvisioningEvent::RunInterrupted { run_id, report } => {
                warn!(
                    event = name,
                    %run_id,
                    succeeded = report.succeeded,
                    failed = report.failed(),
                    "🛑 RUN: interrupted"
                );
            }
        }
    }
}

/// Forwards every event to each wrapped sink in order
#[derive(Clone, Default)]
pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for CompositeEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeEventSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventSink for CompositeEventSink {
    fn emit(&self, event: ProvisioningEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPublisher;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_composite_forwards_to_every_sink() {
        let first = Arc::new(EventPublisher::new(4));
        let second = Arc::new(EventPublisher::new(4));
        let mut first_rx = first.subscribe();
        let mut second_rx = second.subscribe();

        let composite = CompositeEventSink::new()
            .with_sink(Arc::new(TracingEventSink))
            .with_sink(first.clone())
            .with_sink(second.clone());
        assert_eq!(composite.len(), 3);

        composite.emit(ProvisioningEvent::RunStarted {
            run_id: Uuid::new_v4(),
            worker_count: 1,
        });

        assert_eq!(first_rx.recv().await.unwrap().event.name(), "run-started");
        assert_eq!(second_rx.recv().await.unwrap().event.name(), "run-started");
    }
}
