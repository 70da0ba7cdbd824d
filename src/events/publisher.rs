use chrono::{DateTime, Utc};
use std::io::Write;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use super::{EventSink, ProvisioningEvent};

/// Broadcast fan-out of provisioning events to any number of subscribers
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub event: ProvisioningEvent,
    pub published_at: DateTime<Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ProvisioningEvent) {
        let event = PublishedEvent {
            event,
            published_at: Utc::now(),
        };

        // send() only fails when nobody is subscribed, which is fine for observation
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl EventSink for EventPublisher {
    fn emit(&self, event: ProvisioningEvent) {
        self.publish(event);
    }
}

/// Write each received event to `out` as one JSON object per line.
///
/// Returns once every publisher handle has been dropped and the backlog is
/// written, yielding the number of lines written. A lagging receiver logs
/// how many events it missed and keeps going.
pub async fn write_json_lines<W: Write>(
    mut receiver: broadcast::Receiver<PublishedEvent>,
    mut out: W,
) -> std::io::Result<usize> {
    let mut written = 0;
    loop {
        match receiver.recv().await {
            Ok(published) => {
                serde_json::to_writer(&mut out, &published.event)?;
                out.write_all(b"\n")?;
                written += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event stream lagged; events were dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
    out.flush()?;
    Ok(written)
}
