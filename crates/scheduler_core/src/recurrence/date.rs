//! Canonical calendar date.
//!
//! # Responsibility
//! - Parse and format the fixed-width `YYYYMMDD` storage/wire format.
//! - Provide the calendar arithmetic used by recurrence steps.
//!
//! # Invariants
//! - Every value is representable as exactly 8 digits (`00000101..=99991231`).
//! - Ordering is chronological and is never derived from the string form.

use super::error::{RecurrenceError, RecurrenceResult};
use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid date shape regex"));

/// Date without time-of-day, canonically `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parses an exact 8-digit `YYYYMMDD` string.
    ///
    /// # Errors
    /// - `InvalidDateFormat` for wrong length, non-digits, or impossible
    ///   calendar dates such as `20230230`.
    pub fn parse(value: &str) -> RecurrenceResult<Self> {
        let invalid = || RecurrenceError::InvalidDateFormat {
            field: "date",
            value: value.to_string(),
        };

        if !DATE_SHAPE_RE.is_match(value) {
            return Err(invalid());
        }

        // Shape check guarantees ASCII digits, so byte slicing is safe.
        let year = value[0..4].parse::<i32>().map_err(|_| invalid())?;
        let month = value[4..6].parse::<u32>().map_err(|_| invalid())?;
        let day = value[6..8].parse::<u32>().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Builds a date from components, `None` when the date does not exist or
    /// falls outside the 4-digit year range.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|date| Self::from_naive(date).ok())
    }

    /// Wraps a chrono date, enforcing the canonical year range.
    pub fn from_naive(date: NaiveDate) -> RecurrenceResult<Self> {
        if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(RecurrenceError::DateOutOfRange)
        }
    }

    /// Current local calendar date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }

    /// Adds whole calendar days.
    pub fn add_days(self, days: u64) -> RecurrenceResult<Self> {
        self.0
            .checked_add_days(Days::new(days))
            .ok_or(RecurrenceError::DateOutOfRange)
            .and_then(Self::from_naive)
    }

    /// Adds whole calendar years.
    ///
    /// Feb 29 landing in a non-leap year rolls forward to Mar 1.
    pub fn add_years(self, years: u32) -> RecurrenceResult<Self> {
        let years = i32::try_from(years).map_err(|_| RecurrenceError::DateOutOfRange)?;
        let target_year = self
            .0
            .year()
            .checked_add(years)
            .filter(|year| *year <= MAX_YEAR)
            .ok_or(RecurrenceError::DateOutOfRange)?;

        NaiveDate::from_ymd_opt(target_year, self.0.month(), self.0.day())
            .or_else(|| NaiveDate::from_ymd_opt(target_year, 3, 1))
            .ok_or(RecurrenceError::DateOutOfRange)
            .and_then(Self::from_naive)
    }

    /// Signed number of days from `self` to `later` (negative when `later`
    /// is earlier).
    pub fn days_until(self, later: Self) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for CalendarDate {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarDate;
    use crate::recurrence::error::RecurrenceError;

    fn date(value: &str) -> CalendarDate {
        CalendarDate::parse(value).expect("test date should parse")
    }

    #[test]
    fn parse_accepts_canonical_dates_and_formats_back() {
        let parsed = date("20240229");
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 2, 29));
        assert_eq!(parsed.to_string(), "20240229");
        assert_eq!(date("00010101").to_string(), "00010101");
    }

    #[test]
    fn parse_rejects_malformed_and_impossible_dates() {
        for value in [
            "", "2024031", "202403011", "2024-03-01", "+2024031", " 20240301", "20230229",
            "20241301", "20240100",
        ] {
            let err = CalendarDate::parse(value).expect_err("malformed date must be rejected");
            assert!(
                matches!(err, RecurrenceError::InvalidDateFormat { field: "date", .. }),
                "unexpected error for `{value}`: {err}"
            );
        }
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(date("20231231") < date("20240101"));
        assert!(date("20240301") > date("20240229"));
        assert_eq!(date("20240301"), date("20240301"));
    }

    #[test]
    fn add_years_rolls_leap_day_forward_to_march_first() {
        assert_eq!(date("20240229").add_years(1).unwrap(), date("20250301"));
        assert_eq!(date("20240229").add_years(4).unwrap(), date("20280229"));
        assert_eq!(date("20230115").add_years(1).unwrap(), date("20240115"));
    }

    #[test]
    fn arithmetic_beyond_year_9999_is_out_of_range() {
        assert_eq!(
            date("99991231").add_days(1),
            Err(RecurrenceError::DateOutOfRange)
        );
        assert_eq!(
            date("99990601").add_years(1),
            Err(RecurrenceError::DateOutOfRange)
        );
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(date("20240101").days_until(date("20240301")), 60);
        assert_eq!(date("20240301").days_until(date("20240101")), -60);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let json = serde_json::to_string(&date("20240115")).unwrap();
        assert_eq!(json, "\"20240115\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("20240115"));
        assert!(serde_json::from_str::<CalendarDate>("\"2024-01-15\"").is_err());
    }
}
