//! Per-user, per-collection change notices.

use log::debug;
use pennywise_core::events::{Collection, DomainEvent, DomainEventSink};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default number of notices buffered per subscriber.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Lightweight broadcast bus that fans out committed change notices.
#[derive(Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Notices for one user's collection only.
    pub fn subscribe(&self, user_id: &str, collection: Collection) -> ChangeStream {
        ChangeStream {
            receiver: self.sender.subscribe(),
            user_id: user_id.to_string(),
            collection,
        }
    }

    /// Every notice, unfiltered.
    pub fn subscribe_all(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// Filtered view over the bus.
///
/// A lagging subscriber skips the notices it missed. Notices only name
/// what changed, so consumers reload the full snapshot either way.
pub struct ChangeStream {
    receiver: broadcast::Receiver<DomainEvent>,
    user_id: String,
    collection: Collection,
}

impl ChangeStream {
    /// Next matching notice, or `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(
                        "Change stream for {} {:?} skipped {} notice(s)",
                        self.user_id, self.collection, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, event: &DomainEvent) -> bool {
        event.user_id() == self.user_id && event.collection() == self.collection
    }
}

/// Delivers committed notices to the external sink and the bus.
#[derive(Clone)]
pub struct ChangePublisher {
    sink: Arc<dyn DomainEventSink>,
    bus: ChangeBus,
}

impl ChangePublisher {
    pub fn new(sink: Arc<dyn DomainEventSink>, bus: ChangeBus) -> Self {
        Self { sink, bus }
    }

    pub fn publish(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        for event in &events {
            self.bus.publish(event.clone());
        }
        self.sink.emit_batch(events);
    }
}
