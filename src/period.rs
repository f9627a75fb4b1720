//! Calendar period keys used to group expenses into months and ISO weeks.
//!
//! The keys are derived from a date with plain functions ([month_key] and
//! [week_key]) so that grouping does not depend on any time-series machinery.
//! Both key types order by the start of the period they name.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::Error;

/// A calendar month, e.g. "2024-03".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    /// Create a month key from a year and a month number in `1..=12`.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `month` is not between 1 and 12.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::Validation(format!(
                "{month} is not a valid month number, expected a number from 1 to 12"
            )));
        }

        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, January is 1.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The month immediately after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        month_key(date) == *self
    }
}

/// Get the calendar month that `date` falls in. The day is discarded.
pub fn month_key(date: Date) -> MonthKey {
    MonthKey {
        year: date.year(),
        month: u8::from(date.month()),
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Validation(format!("\"{s}\" is not a valid month, expected YYYY-MM"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;

        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// An ISO 8601 calendar week, e.g. "2024-W09".
///
/// ISO weeks start on Monday, and the first week of a year is the one that
/// contains that year's first Thursday. This means the last days of December
/// can belong to week 1 of the following ISO year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    iso_year: i32,
    week: u8,
}

impl WeekKey {
    /// The ISO week-numbering year, which may differ from the calendar year.
    pub fn iso_year(&self) -> i32 {
        self.iso_year
    }

    /// The week number within the ISO year, from 1 to 53.
    pub fn week(&self) -> u8 {
        self.week
    }
}

/// Get the ISO week that `date` falls in.
pub fn week_key(date: Date) -> WeekKey {
    let (iso_year, week, _) = date.to_iso_week_date();

    WeekKey { iso_year, week }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.iso_year, self.week)
    }
}

impl Serialize for WeekKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
