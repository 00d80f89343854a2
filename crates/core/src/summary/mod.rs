//! Period summaries: the aggregator, field ownership, and trend deltas.

mod aggregator;
mod delta;
mod summary_model;

pub use aggregator::{recompute, recompute_for_period, SummaryBoard};
pub use delta::{percent_change, percent_change_value, SummaryDelta};
pub use summary_model::{PeriodOverview, PeriodSummary, PeriodWindow, SummarySource};
