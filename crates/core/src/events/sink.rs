//! Where committed change notices go.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Collection, DomainEvent};

/// Receiver of the notices a committed write produces.
///
/// Called from the store's writer after the write is visible, so `emit`
/// must not block or write back into the store. A failed delivery is the
/// sink's problem; the write stays committed.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    /// All notices of one committed write, in emission order.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        events.into_iter().for_each(|event| self.emit(event));
    }
}

/// Keeps every notice in memory so tests can assert on what a write
/// announced.
#[derive(Clone, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<DomainEvent>> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.recorded().clone()
    }

    /// Drains the recorded notices.
    pub fn take(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.recorded())
    }

    /// Collection of each recorded notice, in order.
    pub fn collections(&self) -> Vec<Collection> {
        self.recorded().iter().map(DomainEvent::collection).collect()
    }

    pub fn for_user(&self, user_id: &str) -> Vec<DomainEvent> {
        self.recorded()
            .iter()
            .filter(|event| event.user_id() == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recorded().len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded().is_empty()
    }
}

impl DomainEventSink for RecordingSink {
    fn emit(&self, event: DomainEvent) {
        self.recorded().push(event);
    }
}
