//! Year-month calendar arithmetic.
//!
//! Schedules run at monthly granularity, so the only calendar type the
//! engine needs is a `YearMonth`, exchanged as a zero-padded `"YYYY-MM"`
//! string. The derived ordering (year, then month) matches lexicographic
//! ordering of that canonical string.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DebtPayoffError;
use crate::DebtPayoffResult;

const MAX_YEAR: i32 = 9999;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month, rejecting months outside 1..=12 and years that do not
    /// fit the four-digit canonical form.
    pub fn new(year: i32, month: u32) -> DebtPayoffResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DebtPayoffError::DateError(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(0..=MAX_YEAR).contains(&year) {
            return Err(DebtPayoffError::DateError(format!(
                "year must be between 0 and {MAX_YEAR}, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Shift by a signed number of months, carrying into the year in both
    /// directions. The result may fall outside the four-digit range; use
    /// `checked_add_months` when it has to be written back out.
    pub fn add_months(self, months: i32) -> Self {
        let index = self.month_index() + i64::from(months);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Like `add_months`, but fails when the result has no `"YYYY-MM"` form.
    pub fn checked_add_months(self, months: i32) -> DebtPayoffResult<Self> {
        let shifted = self.add_months(months);
        if !(0..=MAX_YEAR).contains(&shifted.year) {
            return Err(DebtPayoffError::DateError(format!(
                "{months} months from {self} falls outside years 0 to {MAX_YEAR}"
            )));
        }
        Ok(shifted)
    }

    /// Signed number of months from `from` to `to`.
    pub fn difference_in_months(from: YearMonth, to: YearMonth) -> i32 {
        (to.year - from.year) * 12 + (to.month as i32 - from.month as i32)
    }

    /// `"MM-YYYY"`, the display form used in payment tables.
    pub fn to_month_year_string(&self) -> String {
        format!("{:02}-{:04}", self.month, self.year)
    }

    fn month_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DebtPayoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || DebtPayoffError::DateError(format!("expected a YYYY-MM month, got '{s}'"));

        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;

        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of "this month". Scheduling takes the month as an explicit input;
/// the clock is only consulted at the outer boundary.
pub trait MonthClock {
    fn this_month(&self) -> YearMonth;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl MonthClock for SystemClock {
    fn this_month(&self) -> YearMonth {
        YearMonth::from_date(Local::now().date_naive())
    }
}

/// Always reports the same month.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub YearMonth);

impl MonthClock for FixedClock {
    fn this_month(&self) -> YearMonth {
        self.0
    }
}

/// The current calendar month according to the system clock.
pub fn this_month() -> YearMonth {
    SystemClock.this_month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_twelve_months_carries_year() {
        assert_eq!(ym("2017-01").add_months(12), ym("2018-01"));
    }

    #[test]
    fn test_add_negative_month_wraps_to_december() {
        assert_eq!(ym("2017-01").add_months(-1), ym("2016-12"));
        assert_eq!(ym("2017-03").add_months(-15), ym("2015-12"));
    }

    #[test]
    fn test_add_months_within_year() {
        assert_eq!(ym("2017-11").add_months(1), ym("2017-12"));
        assert_eq!(ym("2017-12").add_months(1), ym("2018-01"));
        assert_eq!(ym("2017-06").add_months(0), ym("2017-06"));
    }

    #[test]
    fn test_checked_add_months_stays_in_four_digit_years() {
        assert_eq!(ym("9999-11").checked_add_months(1).unwrap(), ym("9999-12"));
        assert!(matches!(
            ym("9999-12").checked_add_months(1),
            Err(DebtPayoffError::DateError(_))
        ));
        assert!(ym("0000-01").checked_add_months(-1).is_err());
    }

    #[test]
    fn test_difference_in_months() {
        assert_eq!(YearMonth::difference_in_months(ym("2017-01"), ym("2018-01")), 12);
        assert_eq!(YearMonth::difference_in_months(ym("2017-11"), ym("2017-01")), -10);
        assert_eq!(YearMonth::difference_in_months(ym("2017-01"), ym("2023-11")), 82);
    }

    #[test]
    fn test_ordering_matches_canonical_string() {
        let a = ym("2016-12");
        let b = ym("2017-01");
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(YearMonth::new(2017, 3).unwrap().to_string(), "2017-03");
        assert_eq!(ym("2017-3").to_string(), "2017-03");
        assert_eq!(ym("2017-03").to_month_year_string(), "03-2017");
    }

    #[test]
    fn test_parse_rejects_bad_months() {
        assert!("2017-13".parse::<YearMonth>().is_err());
        assert!("2017-00".parse::<YearMonth>().is_err());
        assert!("17-01".parse::<YearMonth>().is_err());
        assert!("2017/01".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let month = ym("2018-02");
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2018-02\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(ym("2019-07"));
        assert_eq!(clock.this_month(), ym("2019-07"));
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(YearMonth::from_date(date), ym("2020-02"));
    }
}
