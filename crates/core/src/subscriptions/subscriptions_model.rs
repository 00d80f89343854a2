use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::time_utils::{clamp_day_in_month, month_start};
use crate::{errors::ValidationError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount: Decimal,
    pub billing_day: u32,
    pub card_ref: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Billing date within the month containing `date`.
    pub fn billing_date_in(&self, date: NaiveDate) -> NaiveDate {
        clamp_day_in_month(month_start(date), self.billing_day)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub amount: Decimal,
    pub billing_day: u32,
    pub card_ref: Option<String>,
}

impl NewSubscription {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.amount <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("Amount must be positive".to_string()).into(),
            );
        }
        if !(1..=31).contains(&self.billing_day) {
            return Err(ValidationError::InvalidInput(format!(
                "Billing day {} is outside 1..31",
                self.billing_day
            ))
            .into());
        }
        Ok(())
    }

    pub fn into_subscription(self, id: String, created_at: DateTime<Utc>) -> Subscription {
        Subscription {
            id,
            user_id: self.user_id,
            name: self.name,
            amount: self.amount,
            billing_day: self.billing_day,
            card_ref: self.card_ref,
            active: true,
            created_at,
        }
    }
}

/// Sum of the amounts of active subscriptions.
pub fn active_monthly_total(subscriptions: &[Subscription]) -> Result<Decimal> {
    subscriptions
        .iter()
        .filter(|s| s.active)
        .try_fold(Decimal::ZERO, |total, s| {
            total.checked_add(s.amount).ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "Subscription total overflows at {}",
                    s.id
                ))
                .into()
            })
        })
}
