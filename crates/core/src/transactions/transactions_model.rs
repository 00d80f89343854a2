//! Transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Result};

/// Kind of a transaction record. Determines which summary field it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
    FixedExpense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Income,
        TransactionKind::Expense,
        TransactionKind::FixedExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::FixedExpense => "FIXED_EXPENSE",
        }
    }
}

/// Domain model representing a stored transaction.
///
/// Records are immutable once created; the engine never updates or deletes
/// them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub card_ref: Option<String>,
    #[serde(default)]
    pub installments: Option<u32>,
    /// Set on ledger entries produced by goal contributions
    #[serde(default)]
    pub goal_ref: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub card_ref: Option<String>,
    pub installments: Option<u32>,
    pub goal_ref: Option<String>,
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Builds a plain record input with no card, installments or goal link.
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            kind,
            amount,
            category: category.into(),
            description: None,
            card_ref: None,
            installments: None,
            goal_ref: None,
            date,
        }
    }

    pub fn with_card(mut self, card_id: impl Into<String>, installments: u32) -> Self {
        self.card_ref = Some(card_id.into());
        self.installments = Some(installments);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when admitting this record must go through the credit engine.
    pub fn is_card_expense(&self) -> bool {
        self.kind == TransactionKind::Expense && self.card_ref.is_some()
    }

    /// Validates the input before it reaches a repository.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            ))
            .into());
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category".to_string()).into());
        }
        Ok(())
    }

    /// Turns the input into a stored record. The store supplies the id and
    /// creation instant.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: self.description,
            card_ref: self.card_ref,
            installments: self.installments,
            goal_ref: self.goal_ref,
            date: self.date,
            created_at,
        }
    }
}
