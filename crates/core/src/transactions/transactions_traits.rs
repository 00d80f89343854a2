//! Transaction repository and service traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::transactions_model::{NewTransaction, TransactionRecord};
use super::transactions_service::TransactionOutcome;
use crate::cards::Card;
use crate::errors::Result;
use crate::summary::{PeriodOverview, PeriodSummary};

/// Trait defining the contract for Transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Full current record set for the user.
    fn load_transactions(&self, user_id: &str) -> Result<Vec<TransactionRecord>>;

    async fn insert_transaction(&self, new_transaction: NewTransaction)
        -> Result<TransactionRecord>;

    /// Charges `charge_amount` on the card and inserts the record in one
    /// transaction. A rejected charge writes nothing.
    async fn record_card_expense(
        &self,
        new_transaction: NewTransaction,
        card_id: &str,
        charge_amount: Decimal,
    ) -> Result<(TransactionRecord, Card)>;
}

/// Trait defining the contract for Transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(&self, user_id: &str) -> Result<Vec<TransactionRecord>>;

    /// Summary of the month `month_offset` months from the one containing
    /// `reference`.
    fn get_period_summary(
        &self,
        user_id: &str,
        reference: DateTime<Utc>,
        month_offset: i32,
    ) -> Result<PeriodSummary>;

    /// Current and prior month summaries for `reference`.
    fn get_period_overview(
        &self,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<PeriodOverview>;

    /// The record-creation path. Card expenses pass through the credit
    /// engine before the record is admitted.
    async fn create_transaction(&self, new_transaction: NewTransaction)
        -> Result<TransactionOutcome>;
}
