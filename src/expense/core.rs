//! Defines the core data models and table schema for expenses.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::ExpenseId};

// ============================================================================
// MODELS
// ============================================================================

/// The largest magnitude accepted for an amount, one quadrillion (10^15).
///
/// Totals of bounded amounts stay far below [Decimal::MAX].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Check that the magnitude of `value` is at most [MAX_AMOUNT].
///
/// `name` is the field named in the error message.
///
/// # Errors
/// Returns an [Error::Validation] if `value` is too large.
pub fn validate_amount(name: &str, value: Decimal) -> Result<Decimal, Error> {
    if value.abs() > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "{name} must be between -{MAX_AMOUNT} and {MAX_AMOUNT}"
        )));
    }

    Ok(value)
}

/// Money spent on something, recorded by the user.
///
/// Expenses are only created by the store. To describe a new expense, use
/// [NewExpense::new].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    pub amount: Decimal,
    /// A free-form label used to group expenses, e.g. "Groceries".
    pub category: String,
    /// The day the money was spent.
    pub date: Date,
}

/// The validated, mutable fields of an expense.
///
/// This is used both to create an expense and to replace all the fields of
/// an existing expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    title: String,
    amount: Decimal,
    category: String,
    date: Date,
}

impl NewExpense {
    /// Validate the fields of an expense.
    ///
    /// Surrounding whitespace is trimmed from `title` and `category`.
    /// Zero and negative amounts are accepted for refunds, up to [MAX_AMOUNT]
    /// in magnitude.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `title` or `category` is blank, or
    /// `amount` is too large.
    pub fn new(title: &str, amount: Decimal, category: &str, date: Date) -> Result<Self, Error> {
        let amount = validate_amount("amount", amount)?;

        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("title must not be empty".to_owned()));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::Validation("category must not be empty".to_owned()));
        }

        Ok(Self {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            date,
        })
    }

    /// The trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The amount of money spent.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The trimmed category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The day the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }
}

/// The JSON body for creating or updating an expense.
///
/// Every field is required and unknown fields are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseForm {
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent, as a JSON number or string.
    pub amount: Decimal,
    /// A free-form label used to group expenses.
    pub category: String,
    /// The day the money was spent in the format YYYY-MM-DD.
    pub date: Date,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        NewExpense::new(&form.title, form.amount, &form.category, form.date)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// Amounts are stored as text so that they round-trip exactly.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
///
/// Expects the columns `id, title, amount, category, date` in that order.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let raw_amount: String = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;

    let amount = Decimal::from_str(&raw_amount)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error)))?;

    Ok(Expense {
        id,
        title,
        amount,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================
