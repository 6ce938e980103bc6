//! Observation horizon: the calendar window every generated event lives in.

use crate::error::{GenError, GenResult};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Horizon {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl Horizon {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days in the horizon, both ends inclusive.
    /// Zero when the horizon is inverted.
    pub fn len_days(&self) -> u64 {
        let span = (self.end - self.start).num_days();
        if span < 0 { 0 } else { span as u64 + 1 }
    }

    /// The date `offset` days after the horizon start.
    pub fn day(&self, offset: u64) -> NaiveDate {
        self.start + chrono::Days::new(offset)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `date` falls after the observation horizon.
    pub fn is_beyond(&self, date: NaiveDate) -> bool {
        date > self.end
    }
}

/// Calendar-month arithmetic, clamped to month end (Jan 31 + 1 = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> GenResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(GenError::DateOutOfRange { date, months })
}

/// Every calendar day in `[from, to]`, inclusive. Empty when `to < from`.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_horizon_spans_two_years() {
        let h = Horizon::new(date(2023, 1, 1), date(2024, 12, 31));
        assert_eq!(h.len_days(), 731);
        assert_eq!(h.day(0), date(2023, 1, 1));
        assert_eq!(h.day(730), date(2024, 12, 31));
        assert!(h.contains(date(2024, 2, 29)));
        assert!(h.is_beyond(date(2025, 1, 1)));
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2023, 6, 1), 24).unwrap(), date(2025, 6, 1));
    }

    #[test]
    fn day_iteration_is_inclusive() {
        let days: Vec<_> = days_inclusive(date(2023, 8, 14), date(2023, 8, 16)).collect();
        assert_eq!(days, vec![date(2023, 8, 14), date(2023, 8, 15), date(2023, 8, 16)]);
        assert_eq!(days_inclusive(date(2023, 8, 16), date(2023, 8, 14)).count(), 0);
    }
}
