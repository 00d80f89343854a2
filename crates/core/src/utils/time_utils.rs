use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for period boundaries.
/// Month windows are cut on local calendar dates in this zone.
pub const DEFAULT_PERIOD_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a local calendar date in the given timezone.
///
/// This is the single source of truth for turning instants into the dates
/// records are bucketed by.
pub fn local_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shifts a first-of-month date by `offset` months (negative goes back).
/// Returns `None` only when the result leaves chrono's supported range.
pub fn shift_month(first_of_month: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let months = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first_of_month.checked_add_months(months)
    } else {
        first_of_month.checked_sub_months(months)
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}

/// The given day of the month, clamped to the month's last day
/// (billing day 31 lands on Feb 28/29).
pub fn clamp_day_in_month(first_of_month: NaiveDate, day: u32) -> NaiveDate {
    let last = days_in_month(first_of_month.year(), first_of_month.month());
    first_of_month
        .with_day(day.clamp(1, last))
        .unwrap_or(first_of_month)
}
