use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d{1,6})-(\d{1,2})-(\d{1,2})\s*$").expect("date pattern is valid")
});

// ── CalendarDate ──────────────────────────────────────────────────────────────

/// A local year/month/day triple with no time-of-day.
///
/// Always holds a real calendar day. Arithmetic that overflows a field
/// (month 13, day 32, day 0) rolls into the neighbouring month or year
/// instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Strict constructor: every field must already be in range.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                PickerError::InvalidArgument(format!(
                    "{year}-{month:02}-{day:02} is not a valid calendar date"
                ))
            })
    }

    /// Builds a date from possibly out-of-range fields, carrying the excess
    /// into the next larger unit.
    pub fn from_overflow(year: i64, month: i64, day: i64) -> Result<Self> {
        let total = month
            .checked_sub(1)
            .and_then(|month0| year.checked_mul(12)?.checked_add(month0))
            .ok_or(PickerError::OutOfRange { year })?;
        let norm_year = total.div_euclid(12);
        let norm_month = (total.rem_euclid(12) + 1) as u32;

        let out_of_range = PickerError::OutOfRange { year: norm_year };
        let year32 = i32::try_from(norm_year).map_err(|_| out_of_range.clone())?;
        let first = NaiveDate::from_ymd_opt(year32, norm_month, 1).ok_or(out_of_range.clone())?;
        let offset = day
            .checked_sub(1)
            .and_then(TimeDelta::try_days)
            .ok_or(out_of_range.clone())?;
        first
            .checked_add_signed(offset)
            .map(Self)
            .ok_or(out_of_range)
    }

    /// Parses `YYYY-MM-DD`, the inverse of [`CalendarDate::format`].
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || PickerError::InvalidArgument(format!("`{text}` is not a YYYY-MM-DD date"));
        let caps = DATE_PATTERN.captures(text).ok_or_else(invalid)?;
        let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let month = caps[2].parse::<u32>().map_err(|_| invalid())?;
        let day = caps[3].parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month, day)
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

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_saturday(self) -> bool {
        self.weekday() == Weekday::Sat
    }

    pub fn is_sunday(self) -> bool {
        self.weekday() == Weekday::Sun
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn first_of_month(self) -> Self {
        // Day 1 exists in every month chrono can represent.
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn add_days(self, delta: i64) -> Result<Self> {
        let day = i64::from(self.day())
            .checked_add(delta)
            .ok_or(PickerError::OutOfRange { year: i64::from(self.year()) })?;
        Self::from_overflow(i64::from(self.year()), i64::from(self.month()), day)
    }

    pub fn add_months(self, delta: i32) -> Result<Self> {
        Self::from_overflow(
            i64::from(self.year()),
            i64::from(self.month()) + i64::from(delta),
            i64::from(self.day()),
        )
    }

    pub fn add_years(self, delta: i32) -> Result<Self> {
        Self::from_overflow(
            i64::from(self.year()) + i64::from(delta),
            i64::from(self.month()),
            i64::from(self.day()),
        )
    }

    /// Moves to `year`, keeping month and day (Feb 29 rolls to Mar 1).
    pub fn with_year(self, year: i32) -> Result<Self> {
        Self::from_overflow(i64::from(year), i64::from(self.month()), i64::from(self.day()))
    }

    pub fn with_month(self, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PickerError::InvalidArgument(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Self::from_overflow(i64::from(self.year()), i64::from(month), i64::from(self.day()))
    }

    /// `YYYY-MM-DD` with the year unpadded.
    pub fn format(self) -> String {
        format!("{}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for CalendarDate {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = PickerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.format()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

// ── Grid math ─────────────────────────────────────────────────────────────────

/// First day shown in the month grid: the 1st of the cursor's month, walked
/// back to the preceding Sunday.
pub fn start_of_grid(cursor: CalendarDate) -> Result<CalendarDate> {
    let first = cursor.first_of_month();
    let back = first.weekday().num_days_from_sunday();
    first.add_days(-i64::from(back))
}

/// Week number shown beside a Sunday-first grid row.
///
/// The row's first day is moved forward one day so the row is numbered by
/// its Monday, then the ISO-8601 rule applies: find the Thursday of that
/// week and count weeks from the start of the Thursday's year.
pub fn iso_week_number(date: CalendarDate) -> Result<u32> {
    let shifted = date.add_days(1)?;
    let iso_weekday = shifted.weekday().number_from_monday();
    let thursday = shifted.add_days(4 - i64::from(iso_weekday))?;
    Ok(thursday.naive().ordinal0() / 7 + 1)
}

pub fn same_day(a: CalendarDate, b: CalendarDate) -> bool {
    a.format() == b.format()
}
