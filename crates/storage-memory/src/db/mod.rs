//! Shared record tables and the transactional writer.

mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pennywise_core::cards::Card;
use pennywise_core::events::DomainEvent;
use pennywise_core::goals::Goal;
use pennywise_core::subscriptions::Subscription;
use pennywise_core::transactions::TransactionRecord;
use pennywise_core::Result;

use crate::errors::StorageError;

/// Every collection, keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub transactions: BTreeMap<String, TransactionRecord>,
    pub goals: BTreeMap<String, Goal>,
    pub cards: BTreeMap<String, Card>,
    pub subscriptions: BTreeMap<String, Subscription>,
}

impl Tables {
    /// The user's transactions, oldest first.
    pub fn user_transactions(&self, user_id: &str) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .transactions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    /// The user's goals, earliest created first.
    pub fn user_goals(&self, user_id: &str) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self
            .goals
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        goals
    }

    pub fn user_cards(&self, user_id: &str) -> Vec<Card> {
        self.cards
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn user_subscriptions(&self, user_id: &str) -> Vec<Subscription> {
        self.subscriptions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }
}

pub type SharedTables = Arc<RwLock<Tables>>;

pub fn read_tables(tables: &SharedTables) -> Result<RwLockReadGuard<'_, Tables>> {
    Ok(tables.read().map_err(StorageError::from)?)
}

pub(crate) fn write_tables(tables: &SharedTables) -> Result<RwLockWriteGuard<'_, Tables>> {
    Ok(tables.write().map_err(StorageError::from)?)
}

/// A write in progress.
///
/// Jobs mutate a private draft of the tables and record the change notices
/// they cause. The writer swaps the draft in and publishes the notices only
/// when the job succeeds.
pub struct WriteTx {
    tables: Tables,
    events: Vec<DomainEvent>,
}

impl WriteTx {
    pub(crate) fn new(tables: Tables) -> Self {
        Self {
            tables,
            events: Vec::new(),
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut Tables {
        &mut self.tables
    }

    /// Queues a notice for delivery after commit.
    pub fn emit(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    pub(crate) fn into_parts(self) -> (Tables, Vec<DomainEvent>) {
        (self.tables, self.events)
    }
}
