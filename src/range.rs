//! Date range resolution
//!
//! A range is `start` plus a day count; its dates are
//! `start, start + 1, ..., start + days - 1`.

use crate::validation::{check_days, ValidationError};
use chrono::{Days, NaiveDate};

/// Resolve the first date of a range
///
/// An explicit start is returned unchanged, without any plausibility check.
/// Otherwise the range is anchored so that it ends on `today`:
/// `today - (max(days, 1) - 1)`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use exchange_rate_downloader::range::resolve_start_date;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(
///     resolve_start_date(today, 7, None),
///     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
/// );
/// ```
pub fn resolve_start_date(today: NaiveDate, days: u32, explicit_start: Option<NaiveDate>) -> NaiveDate {
    if let Some(start) = explicit_start {
        return start;
    }

    let back = u64::from(days.max(1) - 1);
    // Only fails before the minimum representable date
    today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// Iterate `days` consecutive dates starting at `start`
///
/// Stops early rather than wrapping if the run passes the last representable
/// date.
pub fn dates_from(start: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..u64::from(days)).map_while(move |offset| start.checked_add_days(Days::new(offset)))
}

/// Contiguous run of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    days: u32,
}

impl DateRange {
    /// Create a range, enforcing `1 <= days <= max_days`
    pub fn new(start: NaiveDate, days: u32, max_days: u32) -> Result<Self, ValidationError> {
        let days = check_days(i64::from(days), max_days)?;
        Ok(Self { start, days })
    }

    /// First date of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Number of dates in the range
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Last date of the range (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.dates().last().unwrap_or(self.start)
    }

    /// Dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        dates_from(self.start, self.days)
    }
}
