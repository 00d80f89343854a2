//! Installment economics and credit-limit checks.
//!
//! Interest compounds once per installment over the whole principal
//! (`principal * (1 + rate)^n`). This is a flat-total model, not an
//! amortization schedule: principal is never reduced period by period.
//!
//! `authorize` followed by `apply_charge` is check-then-act. Two callers
//! working from the same card snapshot can both pass `authorize`; anything
//! that persists `used_credit` must run [`authorize_and_apply`] inside one
//! store transaction instead.

use log::debug;
use rust_decimal::{Decimal, MathematicalOps};

use super::cards_model::{Card, InstallmentPlan};
use crate::errors::{CreditError, ValidationError};
use crate::Result;

/// Computes the installment plan for `principal` split over
/// `installment_count` payments at `monthly_rate_percent` per period.
///
/// The count is not defaulted: zero is a precondition violation and fails
/// with [`CreditError::InvalidInstallmentCount`].
pub fn plan(
    principal: Decimal,
    installment_count: u32,
    monthly_rate_percent: Decimal,
) -> Result<InstallmentPlan> {
    if installment_count < 1 {
        return Err(CreditError::InvalidInstallmentCount(installment_count).into());
    }

    let monthly_rate = monthly_rate_percent / Decimal::ONE_HUNDRED;
    let count = Decimal::from(installment_count);

    let total_with_interest = if monthly_rate.is_zero() {
        principal
    } else {
        (Decimal::ONE + monthly_rate)
            .checked_powu(u64::from(installment_count))
            .and_then(|factor| principal.checked_mul(factor))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "Installment plan overflows: {} at {}% over {} installments",
                    principal, monthly_rate_percent, installment_count
                ))
            })?
    };

    let installment_value = total_with_interest / count;
    let interest_paid = total_with_interest - principal;

    debug!(
        "Planned {} over {} installments at {}%: total {}, per installment {}",
        principal, installment_count, monthly_rate_percent, total_with_interest, installment_value
    );

    Ok(InstallmentPlan {
        principal,
        installment_count,
        monthly_rate,
        total_with_interest,
        installment_value,
        interest_paid,
    })
}

/// Checks a charge against the card's remaining limit. Never mutates.
pub fn authorize(card: &Card, charge_amount: Decimal) -> std::result::Result<(), CreditError> {
    let available = card.available_limit();
    if charge_amount > available {
        return Err(CreditError::InsufficientLimit { available });
    }
    Ok(())
}

/// Adds the drawn principal to the card's used credit and returns the new
/// figure. Interest from the plan is not tracked against the line.
///
/// Fails without touching the card when the sum leaves the decimal range.
pub fn apply_charge(card: &mut Card, charge_amount: Decimal) -> Result<Decimal> {
    card.used_credit = card.used_credit.checked_add(charge_amount).ok_or_else(|| {
        ValidationError::InvalidInput(format!(
            "Used credit on card {} overflows when adding {}",
            card.id, charge_amount
        ))
    })?;
    Ok(card.used_credit)
}

/// Conditional increment: authorize and apply as one step on the card the
/// caller holds exclusively. On rejection the card is left untouched.
pub fn authorize_and_apply(card: &mut Card, charge_amount: Decimal) -> Result<Decimal> {
    authorize(card, charge_amount)?;
    apply_charge(card, charge_amount)
}
