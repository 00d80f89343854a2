//! Signed percentage change between two periods, for trend display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::summary_model::PeriodSummary;
use crate::constants::DELTA_DECIMAL_PRECISION;

fn saturated(positive: bool) -> Decimal {
    if positive {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}

/// `(current - previous) / previous * 100`, or `None` when `previous` is
/// zero. Overflow saturates at the decimal range.
pub fn percent_change_value(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let diff = current
        .checked_sub(previous)
        .unwrap_or_else(|| saturated(current.is_sign_positive()));
    let positive = diff.is_sign_positive() == previous.is_sign_positive();
    let change = diff
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| saturated(positive));
    Some(change)
}

/// Formats the change for display: `"+12.3%"`, `"-4.0%"`, `"0.0%"`.
///
/// A zero `previous` gives `"+100%"` when `current` is positive and `"0%"`
/// otherwise. Total: never fails, for any pair of inputs.
pub fn percent_change(current: Decimal, previous: Decimal) -> String {
    let Some(change) = percent_change_value(current, previous) else {
        return if current > Decimal::ZERO {
            "+100%".to_string()
        } else {
            "0%".to_string()
        };
    };

    let rounded = change.round_dp_with_strategy(
        DELTA_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        "0.0%".to_string()
    } else if rounded.is_sign_positive() {
        format!("+{:.1}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Per-field trend labels between two summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDelta {
    pub income: String,
    pub expense: String,
    pub fixed_expense: String,
    pub balance: String,
}

impl SummaryDelta {
    pub fn between(current: &PeriodSummary, previous: &PeriodSummary) -> Self {
        Self {
            income: percent_change(current.income, previous.income),
            expense: percent_change(current.expense, previous.expense),
            fixed_expense: percent_change(current.fixed_expense, previous.fixed_expense),
            balance: percent_change(current.balance, previous.balance),
        }
    }
}
