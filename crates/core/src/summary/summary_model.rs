//! Summary domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::delta::SummaryDelta;
use crate::errors::ValidationError;
use crate::transactions::TransactionKind;
use crate::utils::time_utils::{month_start, shift_month};
use crate::Result;

/// Income, expense, fixed expense and balance over one window.
///
/// Derived, never persisted. `balance` is clamped at zero: spendable
/// balance is never reported negative. Use [`PeriodSummary::net`] for the
/// unclamped figure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub fixed_expense: Decimal,
    pub balance: Decimal,
}

impl PeriodSummary {
    /// Unclamped `income - expense - fixed_expense`.
    pub fn net(&self) -> Decimal {
        self.income
            .saturating_sub(self.expense)
            .saturating_sub(self.fixed_expense)
    }

    /// Re-derives `balance` from the other three fields.
    pub(crate) fn rebalance(&mut self) {
        self.balance = self.net().max(Decimal::ZERO);
    }
}

/// Logical stream feeding a summary. Each source owns a fixed set of
/// fields and only ever overwrites those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SummarySource {
    /// Owns `income` and `expense`.
    Transactions,
    /// Owns `fixed_expense`.
    FixedExpenses,
}

impl SummarySource {
    pub const ALL: [SummarySource; 2] = [SummarySource::Transactions, SummarySource::FixedExpenses];

    pub fn for_kind(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income | TransactionKind::Expense => SummarySource::Transactions,
            TransactionKind::FixedExpense => SummarySource::FixedExpenses,
        }
    }

    pub fn owns(&self, kind: TransactionKind) -> bool {
        Self::for_kind(kind) == *self
    }
}

/// Half-open calendar window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    /// The calendar month `offset` months away from the month containing
    /// `reference` (0 is the current month, -1 the one before).
    pub fn month(reference: NaiveDate, offset: i32) -> Result<Self> {
        let out_of_range = || {
            ValidationError::InvalidInput(format!(
                "Month offset {} from {} is out of range",
                offset, reference
            ))
        };
        let start = shift_month(month_start(reference), offset).ok_or_else(out_of_range)?;
        let end = shift_month(start, 1).ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Current-period and prior-period summaries side by side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOverview {
    pub window: PeriodWindow,
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
}

impl PeriodOverview {
    pub fn deltas(&self) -> SummaryDelta {
        SummaryDelta::between(&self.current, &self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rebalance_clamps_at_zero() {
        let mut summary = PeriodSummary {
            income: dec!(1000),
            expense: dec!(300),
            fixed_expense: dec!(800),
            balance: dec!(0),
        };
        summary.rebalance();
        assert_eq!(summary.balance, dec!(0));
        assert_eq!(summary.net(), dec!(-100));
    }

    #[test]
    fn test_month_window_is_half_open() {
        let reference = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let window = PeriodWindow::month(reference, 0).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert!(window.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));

        let previous = PeriodWindow::month(reference, -1).unwrap();
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(previous.end, window.start);
    }

    #[test]
    fn test_source_ownership() {
        assert!(SummarySource::Transactions.owns(TransactionKind::Income));
        assert!(SummarySource::Transactions.owns(TransactionKind::Expense));
        assert!(!SummarySource::Transactions.owns(TransactionKind::FixedExpense));
        assert!(SummarySource::FixedExpenses.owns(TransactionKind::FixedExpense));
    }
}
