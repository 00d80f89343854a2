//! The assembled store: shared tables, writer, bus and repositories.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use log::info;
use pennywise_core::events::{Collection, DomainEventSink};
use pennywise_core::utils::clock::{Clock, SystemClock};
use pennywise_core::Result;

use crate::cards::CardRepository;
use crate::change_bus::{ChangeBus, ChangePublisher, ChangeStream};
use crate::db::{read_tables, spawn_writer, SharedTables, WriteHandle};
use crate::errors::StorageError;
use crate::goals::GoalRepository;
use crate::seed::SeedDocument;
use crate::subscriptions::SubscriptionRepository;
use crate::transactions::TransactionRepository;

/// In-process document store.
///
/// Every committed write is announced to the sink given at construction
/// and on the change bus. Must be created inside a tokio runtime.
pub struct MemoryStore {
    tables: SharedTables,
    writer: WriteHandle,
    bus: ChangeBus,
    transaction_repository: Arc<TransactionRepository>,
    goal_repository: Arc<GoalRepository>,
    card_repository: Arc<CardRepository>,
    subscription_repository: Arc<SubscriptionRepository>,
}

impl MemoryStore {
    pub fn new(sink: Arc<dyn DomainEventSink>) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock))
    }

    /// Store stamping `created_at` from `clock`.
    pub fn with_clock(sink: Arc<dyn DomainEventSink>, clock: Arc<dyn Clock>) -> Self {
        let tables: SharedTables = Arc::new(RwLock::new(Default::default()));
        let bus = ChangeBus::default();
        let writer = spawn_writer(tables.clone(), ChangePublisher::new(sink, bus.clone()));

        Self {
            transaction_repository: Arc::new(TransactionRepository::new(
                tables.clone(),
                writer.clone(),
                clock.clone(),
            )),
            goal_repository: Arc::new(GoalRepository::new(
                tables.clone(),
                writer.clone(),
                clock.clone(),
            )),
            card_repository: Arc::new(CardRepository::new(
                tables.clone(),
                writer.clone(),
                clock.clone(),
            )),
            subscription_repository: Arc::new(SubscriptionRepository::new(
                tables.clone(),
                writer.clone(),
                clock,
            )),
            tables,
            writer,
            bus,
        }
    }

    pub fn transaction_repository(&self) -> Arc<TransactionRepository> {
        self.transaction_repository.clone()
    }

    pub fn goal_repository(&self) -> Arc<GoalRepository> {
        self.goal_repository.clone()
    }

    pub fn card_repository(&self) -> Arc<CardRepository> {
        self.card_repository.clone()
    }

    pub fn subscription_repository(&self) -> Arc<SubscriptionRepository> {
        self.subscription_repository.clone()
    }

    pub fn write_handle(&self) -> WriteHandle {
        self.writer.clone()
    }

    pub fn change_bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Change notices for one user's collection.
    pub fn subscribe(&self, user_id: &str, collection: Collection) -> ChangeStream {
        self.bus.subscribe(user_id, collection)
    }

    /// Every user owning at least one record, sorted.
    pub fn user_ids(&self) -> Result<Vec<String>> {
        let tables = read_tables(&self.tables)?;
        let users: BTreeSet<String> = tables
            .transactions
            .values()
            .map(|r| r.user_id.clone())
            .chain(tables.goals.values().map(|g| g.user_id.clone()))
            .chain(tables.cards.values().map(|c| c.user_id.clone()))
            .chain(tables.subscriptions.values().map(|s| s.user_id.clone()))
            .collect();
        Ok(users.into_iter().collect())
    }

    /// Loads a seed document in one write. Records with an existing id are
    /// replaced. Returns the number of records imported.
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let document: SeedDocument = serde_json::from_str(json).map_err(StorageError::from)?;
        let count = document.len();
        self.writer
            .exec(move |tx| {
                document.write_into(tx);
                Ok(())
            })
            .await?;
        info!("Imported {} seed record(s)", count);
        Ok(count)
    }

    /// Current contents of every collection as a seed document.
    pub fn export_json(&self) -> Result<String> {
        let document = SeedDocument::from_tables(&*read_tables(&self.tables)?);
        Ok(serde_json::to_string_pretty(&document).map_err(StorageError::from)?)
    }
}
