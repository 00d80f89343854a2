//! Pure recompute-from-snapshot aggregation.
//!
//! Every function here folds the full record set it is handed. Nothing
//! reads a previous summary, so duplicate or out-of-order change delivery
//! cannot make the result drift.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::debug;

use super::summary_model::{PeriodSummary, PeriodWindow, SummarySource};
use crate::errors::ValidationError;
use crate::transactions::{TransactionKind, TransactionRecord};
use crate::utils::time_utils::local_date_from_utc;
use crate::Result;

fn fold<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> Result<PeriodSummary> {
    let mut summary = PeriodSummary::default();
    for record in records {
        let total = match record.kind {
            TransactionKind::Income => &mut summary.income,
            TransactionKind::Expense => &mut summary.expense,
            TransactionKind::FixedExpense => &mut summary.fixed_expense,
        };
        *total = total.checked_add(record.amount).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "{} total overflows at record {}",
                record.kind.as_str(),
                record.id
            ))
        })?;
    }
    summary.rebalance();
    Ok(summary)
}

/// Folds the complete record set into a summary. Fails only when a total
/// leaves the decimal range.
pub fn recompute(records: &[TransactionRecord]) -> Result<PeriodSummary> {
    fold(records)
}

/// Summary for the calendar month `month_offset` months away from the
/// month containing `reference` in `tz`.
pub fn recompute_for_period(
    records: &[TransactionRecord],
    reference: DateTime<Utc>,
    month_offset: i32,
    tz: Tz,
) -> Result<PeriodSummary> {
    let window = PeriodWindow::month(local_date_from_utc(reference, tz), month_offset)?;
    let summary = fold(records.iter().filter(|r| window.contains(r.date)))?;
    debug!(
        "Recomputed period {}..{} over {} record(s): balance {}",
        window.start,
        window.end,
        records.len(),
        summary.balance
    );
    Ok(summary)
}

/// Summary fed by several independent sources.
///
/// Applying a snapshot from one source refolds only the fields that source
/// owns and leaves the others alone, so a fixed-expense update never zeroes
/// income while the transaction stream is mid-flight. After each apply the
/// board equals a full fold over the latest snapshot of every source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryBoard {
    summary: PeriodSummary,
}

impl SummaryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the fields owned by `source` with a fold of `records`.
    /// Records of kinds the source does not own are ignored. On error the
    /// board is left as it was.
    pub fn apply(
        &mut self,
        source: SummarySource,
        records: &[TransactionRecord],
    ) -> Result<&PeriodSummary> {
        let partial = fold(records.iter().filter(|r| source.owns(r.kind)))?;
        match source {
            SummarySource::Transactions => {
                self.summary.income = partial.income;
                self.summary.expense = partial.expense;
            }
            SummarySource::FixedExpenses => {
                self.summary.fixed_expense = partial.fixed_expense;
            }
        }
        self.summary.rebalance();
        Ok(&self.summary)
    }

    pub fn summary(&self) -> &PeriodSummary {
        &self.summary
    }
}
