use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::Serialize;

use super::transactions_model::{NewTransaction, TransactionRecord};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::cards::{authorize, plan, Card, CardRepositoryTrait, InstallmentPlan};
use crate::errors::{CreditError, Result, ValidationError};
use crate::summary::{recompute_for_period, PeriodOverview, PeriodSummary, PeriodWindow};
use crate::utils::time_utils::local_date_from_utc;

/// What the record-creation path produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub record: TransactionRecord,
    /// Present for card expenses
    pub plan: Option<InstallmentPlan>,
    /// Card state after the charge, for card expenses
    pub card: Option<Card>,
}

pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    card_repository: Arc<dyn CardRepositoryTrait>,
    tz: Tz,
}

impl TransactionService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        card_repository: Arc<dyn CardRepositoryTrait>,
        tz: Tz,
    ) -> Self {
        TransactionService {
            transaction_repository,
            card_repository,
            tz,
        }
    }

    async fn create_card_expense(
        &self,
        mut new_transaction: NewTransaction,
        card_id: String,
    ) -> Result<TransactionOutcome> {
        let card = self.card_repository.get_card(&card_id)?;
        // Someone else's card looks the same as a missing one
        if card.user_id != new_transaction.user_id {
            warn!(
                "User {} tried to charge card {} owned by another user",
                new_transaction.user_id, card_id
            );
            return Err(CreditError::CardNotFound(card_id).into());
        }

        let installments = new_transaction.installments.unwrap_or(1).max(1);
        new_transaction.installments = Some(installments);
        let principal = new_transaction.amount;
        let plan = plan(principal, installments, card.interest_rate)?;

        // Early rejection from the snapshot; the store re-checks atomically.
        if let Err(e) = authorize(&card, principal) {
            warn!("Charge of {} rejected on card {}: {}", principal, card_id, e);
            return Err(e.into());
        }

        // Only the principal is drawn against the credit line.
        let (record, card) = self
            .transaction_repository
            .record_card_expense(new_transaction, &card_id, principal)
            .await?;
        debug!(
            "Admitted card expense {} on {}: used credit now {}",
            record.id, card.id, card.used_credit
        );

        Ok(TransactionOutcome {
            record,
            plan: Some(plan),
            card: Some(card),
        })
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        self.transaction_repository.load_transactions(user_id)
    }

    fn get_period_summary(
        &self,
        user_id: &str,
        reference: DateTime<Utc>,
        month_offset: i32,
    ) -> Result<PeriodSummary> {
        let records = self.transaction_repository.load_transactions(user_id)?;
        recompute_for_period(&records, reference, month_offset, self.tz)
    }

    fn get_period_overview(
        &self,
        user_id: &str,
        reference: DateTime<Utc>,
    ) -> Result<PeriodOverview> {
        let records = self.transaction_repository.load_transactions(user_id)?;
        Ok(PeriodOverview {
            window: PeriodWindow::month(local_date_from_utc(reference, self.tz), 0)?,
            current: recompute_for_period(&records, reference, 0, self.tz)?,
            previous: recompute_for_period(&records, reference, -1, self.tz)?,
        })
    }

    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<TransactionOutcome> {
        new_transaction.validate()?;

        if new_transaction.is_card_expense() {
            let card_id = new_transaction.card_ref.clone().ok_or_else(|| {
                ValidationError::MissingField("cardRef".to_string())
            })?;
            return self.create_card_expense(new_transaction, card_id).await;
        }

        let record = self
            .transaction_repository
            .insert_transaction(new_transaction)
            .await?;
        Ok(TransactionOutcome {
            record,
            plan: None,
            card: None,
        })
    }
}
