//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Expense, NewExpense, map_expense_row},
    stores::ExpenseStore,
};

/// Stores expenses in a SQLite database.
///
/// The expense table must already exist, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::UpstreamUnavailable("could not acquire the database lock".to_owned())
        })
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpstreamUnavailable] if the database cannot be reached,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.connection()?;

        let expense = connection
            .prepare(
                "INSERT INTO expense (title, amount, category, date)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, title, amount, category, date",
            )?
            .query_row(
                (
                    expense.title(),
                    expense.amount().to_string(),
                    expense.category(),
                    expense.date(),
                ),
                map_expense_row,
            )?;

        tracing::debug!("created expense {}", expense.id);

        Ok(expense)
    }

    /// Retrieve an expense in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let expense = self
            .connection()?
            .prepare("SELECT id, title, amount, category, date FROM expense WHERE id = :id")?
            .query_row(&[(":id", &id)], map_expense_row)?;

        Ok(expense)
    }

    fn list(&self, offset: u64, limit: u64) -> Result<Vec<Expense>, Error> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let connection = self.connection()?;
        let mut statement = connection.prepare(
            "SELECT id, title, amount, category, date FROM expense
             ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )?;

        skip_unreadable(statement.query_map((limit, offset), map_expense_row)?)
    }

    /// Replace the title, amount, category and date of the expense `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(&mut self, id: ExpenseId, expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.connection()?;

        let expense = connection
            .prepare(
                "UPDATE expense SET title = ?1, amount = ?2, category = ?3, date = ?4
                 WHERE id = ?5
                 RETURNING id, title, amount, category, date",
            )?
            .query_row(
                (
                    expense.title(),
                    expense.amount().to_string(),
                    expense.category(),
                    expense.date(),
                    id,
                ),
                map_expense_row,
            )?;

        tracing::debug!("updated expense {id}");

        Ok(expense)
    }

    /// Delete the expense `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&mut self, id: ExpenseId) -> Result<(), Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        tracing::debug!("deleted expense {id}");

        Ok(())
    }

    fn all(&self) -> Result<Vec<Expense>, Error> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(
            "SELECT id, title, amount, category, date FROM expense ORDER BY date ASC, id ASC",
        )?;

        skip_unreadable(statement.query_map([], map_expense_row)?)
    }

    /// Get the total number of expenses in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn count(&self) -> Result<usize, Error> {
        self.connection()?
            .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
            .map_err(|error| error.into())
    }
}

/// Collect the expenses from `rows`, skipping rows with a malformed amount or date.
fn skip_unreadable(
    rows: impl Iterator<Item = Result<Expense, rusqlite::Error>>,
) -> Result<Vec<Expense>, Error> {
    let mut expenses = Vec::new();

    for row in rows {
        match row {
            Ok(expense) => expenses.push(expense),
            Err(
                error @ (rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..)),
            ) => {
                tracing::warn!("Skipping an expense that could not be read: {error}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(expenses)
}
