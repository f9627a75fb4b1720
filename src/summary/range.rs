//! Date-range filtering for the summary endpoints.

use serde::Deserialize;
use time::Date;

use crate::{Error, expense::Expense, stores::ExpenseStore};

/// An inclusive range of dates. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct DateRange {
    /// The earliest date to include.
    pub start: Option<Date>,
    /// The latest date to include.
    pub end: Option<Date>,
}

impl DateRange {
    /// Check that the range is not empty.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `start` is after `end`.
    pub fn validate(self) -> Result<Self, Error> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(Error::Validation(
                "start date cannot be after end date".to_owned(),
            )),
            _ => Ok(self),
        }
    }

    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

/// Get the expenses from `store` that are dated within `range`.
///
/// # Errors
/// Returns an [Error::Validation] if `range` is invalid, or any error from the store.
pub(crate) fn fetch_expenses_in_range(
    store: &impl ExpenseStore,
    range: DateRange,
) -> Result<Vec<Expense>, Error> {
    let range = range.validate()?;

    let expenses = store
        .all()?
        .into_iter()
        .filter(|expense| range.contains(expense.date))
        .collect();

    Ok(expenses)
}
