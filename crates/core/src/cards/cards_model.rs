//! Card and installment domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::CreditError;
use crate::utils::time_utils::{clamp_day_in_month, month_start, shift_month};
use crate::{errors::ValidationError, Result};

/// Domain model representing a credit card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub user_id: String,
    pub bank: String,
    pub brand: String,
    pub last4_digits: String,
    /// Percent per installment period; zero means interest-free
    pub interest_rate: Decimal,
    pub credit_limit: Decimal,
    pub used_credit: Decimal,
    /// Day of month the statement closes (1..=31)
    pub billing_day: u32,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// What is left on the credit line. Negative when concurrent writers
    /// outside the store pushed usage past the limit.
    pub fn available_limit(&self) -> Decimal {
        self.credit_limit - self.used_credit
    }

    /// Share of the limit in use, as a percentage. Zero for a zero limit.
    pub fn utilization_percent(&self) -> Decimal {
        if self.credit_limit.is_zero() {
            return Decimal::ZERO;
        }
        (self.used_credit / self.credit_limit * Decimal::ONE_HUNDRED)
            .round_dp(DISPLAY_DECIMAL_PRECISION)
    }
}

/// Input model for creating a new card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub id: Option<String>,
    pub user_id: String,
    pub bank: String,
    pub brand: String,
    pub last4_digits: String,
    pub interest_rate: Decimal,
    pub credit_limit: Decimal,
    #[serde(default)]
    pub used_credit: Decimal,
    pub billing_day: u32,
}

impl NewCard {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if !(1..=31).contains(&self.billing_day) {
            return Err(ValidationError::InvalidInput(format!(
                "Billing day must be between 1 and 31, got {}",
                self.billing_day
            ))
            .into());
        }
        if self.interest_rate < Decimal::ZERO
            || self.credit_limit < Decimal::ZERO
            || self.used_credit < Decimal::ZERO
        {
            return Err(ValidationError::InvalidInput(
                "Interest rate, credit limit and used credit must not be negative".to_string(),
            )
            .into());
        }
        if self.last4_digits.len() != 4 || !self.last4_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidInput(format!(
                "Expected four digits, got '{}'",
                self.last4_digits
            ))
            .into());
        }
        Ok(())
    }

    pub fn into_card(self, id: String, created_at: DateTime<Utc>) -> Card {
        Card {
            id,
            user_id: self.user_id,
            bank: self.bank,
            brand: self.brand,
            last4_digits: self.last4_digits,
            interest_rate: self.interest_rate,
            credit_limit: self.credit_limit,
            used_credit: self.used_credit,
            billing_day: self.billing_day,
            created_at,
        }
    }
}

/// Principal, interest and per-payment breakdown for a charge split over
/// several installments. Derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub principal: Decimal,
    pub installment_count: u32,
    /// Rate per installment as a fraction (10% is 0.1)
    pub monthly_rate: Decimal,
    pub total_with_interest: Decimal,
    pub installment_value: Decimal,
    pub interest_paid: Decimal,
}

/// One dated payment of an installment plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

impl InstallmentPlan {
    /// Lays the plan out on billing dates.
    ///
    /// Installment `k` falls on `billing_day` of the k-th month after the
    /// purchase month. Every installment but the last is truncated to cents
    /// and the last one takes the remainder, so amounts are never negative
    /// and the schedule sums to the rounded total.
    pub fn schedule(&self, purchase_date: NaiveDate, billing_day: u32) -> Result<Vec<Installment>> {
        let first_month = month_start(purchase_date);
        let rounded_value = self
            .installment_value
            .round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::ToZero);
        let rounded_total = self
            .total_with_interest
            .round_dp(DISPLAY_DECIMAL_PRECISION);

        let mut installments = Vec::with_capacity(self.installment_count as usize);
        let mut scheduled = Decimal::ZERO;
        for number in 1..=self.installment_count {
            let offset = i32::try_from(number).map_err(|_| {
                CreditError::InvalidInstallmentCount(self.installment_count)
            })?;
            let month = shift_month(first_month, offset).ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "Installment {} falls outside the supported date range",
                    number
                ))
            })?;
            let amount = if number == self.installment_count {
                rounded_total - scheduled
            } else {
                rounded_value
            };
            scheduled += amount;
            installments.push(Installment {
                number,
                due_date: clamp_day_in_month(month, billing_day),
                amount,
            });
        }
        Ok(installments)
    }
}

/// Outcome of a dry-run charge: the plan plus the limit verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargePreview {
    pub card_id: String,
    pub plan: InstallmentPlan,
    pub schedule: Vec<Installment>,
    pub available_limit: Decimal,
    pub authorized: bool,
}
