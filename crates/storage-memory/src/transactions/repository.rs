use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use pennywise_core::cards::Card;
use pennywise_core::events::DomainEvent;
use pennywise_core::transactions::{NewTransaction, TransactionRecord, TransactionRepositoryTrait};
use pennywise_core::utils::clock::Clock;
use pennywise_core::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cards::charge_card_in;
use crate::db::{read_tables, SharedTables, WriteHandle, WriteTx};
use crate::errors::StorageError;

/// Inserts a record inside a write and queues its change notice.
/// Records are immutable: an id that is already taken fails the write.
pub(crate) fn insert_transaction_in(
    tx: &mut WriteTx,
    new_transaction: NewTransaction,
    created_at: DateTime<Utc>,
) -> Result<TransactionRecord> {
    let id = new_transaction
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    if tx.tables().transactions.contains_key(&id) {
        return Err(StorageError::AlreadyExists {
            entity: "Transaction",
            id,
        }
        .into());
    }
    let record = new_transaction.into_record(id, created_at);
    tx.tables_mut()
        .transactions
        .insert(record.id.clone(), record.clone());
    tx.emit(DomainEvent::transactions_changed(
        record.user_id.clone(),
        vec![record.id.clone()],
        vec![record.kind],
    ));
    Ok(record)
}

pub struct TransactionRepository {
    tables: SharedTables,
    writer: WriteHandle,
    clock: Arc<dyn Clock>,
}

impl TransactionRepository {
    pub fn new(tables: SharedTables, writer: WriteHandle, clock: Arc<dyn Clock>) -> Self {
        TransactionRepository {
            tables,
            writer,
            clock,
        }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn load_transactions(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        Ok(read_tables(&self.tables)?.user_transactions(user_id))
    }

    async fn insert_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<TransactionRecord> {
        let created_at = self.clock.now();
        self.writer
            .exec(move |tx| insert_transaction_in(tx, new_transaction, created_at))
            .await
    }

    async fn record_card_expense(
        &self,
        new_transaction: NewTransaction,
        card_id: &str,
        charge_amount: Decimal,
    ) -> Result<(TransactionRecord, Card)> {
        let created_at = self.clock.now();
        let card_id = card_id.to_string();
        let result = self
            .writer
            .exec(move |tx| {
                // Any failure discards the draft, so neither the charge nor
                // the record is kept.
                let card = charge_card_in(tx, &new_transaction.user_id, &card_id, charge_amount)?;
                let record = insert_transaction_in(tx, new_transaction, created_at)?;
                Ok((record, card))
            })
            .await?;
        debug!(
            "Recorded card expense {} on card {}; used credit now {}",
            result.0.id, result.1.id, result.1.used_credit
        );
        Ok(result)
    }
}
