//! Live domain event sink.
//!
//! Receives domain events from the store and forwards them to the live
//! worker for debounced processing.

use std::sync::{Arc, Mutex};

use log::warn;
use tokio::sync::mpsc;

use super::views::{LiveHandles, LiveViews};
use super::worker::{live_event_worker, LiveWorkerDeps};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::GoalRepositoryTrait;
use crate::settings::EngineSettings;
use crate::transactions::{TransactionKind, TransactionRepositoryTrait};
use crate::utils::clock::Clock;

/// Domain event sink feeding the live views.
///
/// # Two-Phase Initialization
///
/// The store needs the sink and the worker needs the store's repositories,
/// so the sink is created first and the worker started once the store
/// exists:
///
/// 1. Create the sink with `new()` - this just creates the channel
/// 2. Call `start_worker()` with the repositories - this spawns the worker
///
/// Events emitted in between are buffered.
pub struct LiveEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
    views: LiveViews,
}

impl LiveEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            views: LiveViews::new(),
        }
    }

    /// Starts the background worker. Must be called from within a tokio
    /// runtime, at most once.
    pub fn start_worker(
        &self,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        clock: Arc<dyn Clock>,
        settings: &EngineSettings,
    ) -> Result<()> {
        settings.validate()?;
        let rx = self
            .rx
            .lock()
            .map_err(|_| Error::Unexpected("live sink lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| Error::Unexpected("live worker already started".to_string()))?;

        let deps = Arc::new(LiveWorkerDeps {
            transaction_repository,
            goal_repository,
            views: self.views.clone(),
            clock,
            tz: settings.tz()?,
            debounce: settings.debounce(),
        });

        tokio::spawn(live_event_worker(rx, deps));
        Ok(())
    }

    pub fn views(&self) -> &LiveViews {
        &self.views
    }

    /// Starts watching a user and returns receivers for the user's views.
    ///
    /// The first call for a user queues a full refresh, so the views leave
    /// `Loading` once the worker has loaded the snapshots.
    pub fn watch_user(&self, user_id: &str) -> LiveHandles {
        if self.views.claim_initial_load(user_id) {
            self.emit_batch(vec![
                DomainEvent::transactions_changed(user_id, vec![], TransactionKind::ALL.to_vec()),
                DomainEvent::goals_changed(user_id, vec![]),
            ]);
        }
        self.views.handles(user_id)
    }

    /// Creates a sink with just the sender. The caller owns the receiver.
    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
            views: LiveViews::new(),
        }
    }
}

impl Default for LiveEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for LiveEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best-effort: a closed channel means the worker is gone.
        if let Err(e) = self.tx.send(event) {
            warn!("Failed to emit live event: {}", e);
        }
    }
}
