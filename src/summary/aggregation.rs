//! Expense aggregation for the summary endpoints.
//!
//! Provides functions to total expenses by calendar month, ISO week and
//! category, and to compute a running total over time. Amounts are summed as
//! decimals, so totals are exact no matter how many small amounts go into them.
//! Every sum is checked; an overflow is returned as [Error::AmountOverflow]
//! rather than panicking.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    expense::Expense,
    period::{MonthKey, WeekKey, month_key, week_key},
};

/// The total amount spent in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<K> {
    /// The month or week the total covers.
    pub period: K,
    /// The sum of the amounts of the expenses dated within `period`.
    pub total: Decimal,
}

/// The total amount spent in a calendar month.
pub type MonthlyBucket = Bucket<MonthKey>;

/// The total amount spent in an ISO week.
pub type WeeklyBucket = Bucket<WeekKey>;

/// The total amount spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category label as entered by the user.
    pub category: String,
    /// The sum of the amounts of the expenses in `category`.
    pub total: Decimal,
}

/// The running total of all expenses up to and including one expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    /// The date of the expense.
    pub date: Date,
    /// The running total after adding the expense.
    pub total: Decimal,
}

/// Add `amount` to `total`.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if the sum does not fit in a [Decimal].
pub(crate) fn add_amount(total: Decimal, amount: Decimal) -> Result<Decimal, Error> {
    total.checked_add(amount).ok_or_else(|| {
        tracing::error!("Overflow adding {amount} to a total of {total}");
        Error::AmountOverflow
    })
}

/// Add up `amounts`, starting from zero.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if the total does not fit in a [Decimal].
pub(crate) fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, Error> {
    amounts.into_iter().try_fold(Decimal::ZERO, add_amount)
}

/// Sums expense amounts by calendar month.
///
/// # Returns
/// One bucket per month that has at least one expense, ordered from the
/// earliest month to the latest.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if a month's total does not fit in a [Decimal].
pub fn monthly(expenses: &[Expense]) -> Result<Vec<MonthlyBucket>, Error> {
    aggregate_by_period(expenses, month_key)
}

/// Sums expense amounts by ISO week.
///
/// # Returns
/// One bucket per week that has at least one expense, ordered from the
/// earliest week to the latest.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if a week's total does not fit in a [Decimal].
pub fn weekly(expenses: &[Expense]) -> Result<Vec<WeeklyBucket>, Error> {
    aggregate_by_period(expenses, week_key)
}

fn aggregate_by_period<K: Ord>(
    expenses: &[Expense],
    period_of: impl Fn(Date) -> K,
) -> Result<Vec<Bucket<K>>, Error> {
    let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();

    for expense in expenses {
        let total = totals
            .entry(period_of(expense.date))
            .or_insert(Decimal::ZERO);
        *total = add_amount(*total, expense.amount)?;
    }

    Ok(totals
        .into_iter()
        .map(|(period, total)| Bucket { period, total })
        .collect())
}

/// Sums expense amounts by category, ordered by category name.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if a category's total does not fit in a [Decimal].
pub fn by_category(expenses: &[Expense]) -> Result<Vec<CategoryTotal>, Error> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();

    for expense in expenses {
        let total = totals
            .entry(expense.category.as_str())
            .or_insert(Decimal::ZERO);
        *total = add_amount(*total, expense.amount)?;
    }

    Ok(totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect())
}

/// Calculates the running total of expenses in date order.
///
/// Expenses on the same day are added in the order they were created.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if the running total does not fit in a [Decimal].
pub fn cumulative(expenses: &[Expense]) -> Result<Vec<CumulativePoint>, Error> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by_key(|expense| (expense.date, expense.id));

    let mut running_total = Decimal::ZERO;

    sorted
        .into_iter()
        .map(|expense| {
            running_total = add_amount(running_total, expense.amount)?;

            Ok(CumulativePoint {
                date: expense.date,
                total: running_total,
            })
        })
        .collect()
}
