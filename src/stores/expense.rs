//! Defines the expense store trait.

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Expense, NewExpense},
};

/// Handles the creation, retrieval, modification and removal of expenses.
///
/// Implementations own the expense records. Everything else in the crate
/// works on the [Expense] values a store hands out.
pub trait ExpenseStore {
    /// Create a new expense in the store and return it with its assigned ID.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error>;

    /// Retrieve an expense from the store.
    ///
    /// Implementers should return [Error::NotFound] if `id` does not refer to an expense.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve at most `limit` expenses ordered by ID, skipping the first `offset`.
    ///
    /// Records that cannot be read are skipped, as in [ExpenseStore::all].
    fn list(&self, offset: u64, limit: u64) -> Result<Vec<Expense>, Error>;

    /// Replace all the fields of the expense with the ID `id`.
    ///
    /// Implementers should return [Error::NotFound] and leave the store
    /// unchanged if `id` does not refer to an expense.
    fn update(&mut self, id: ExpenseId, expense: NewExpense) -> Result<Expense, Error>;

    /// Remove the expense with the ID `id`.
    ///
    /// Implementers should return [Error::NotFound] and leave the store
    /// unchanged if `id` does not refer to an expense.
    fn delete(&mut self, id: ExpenseId) -> Result<(), Error>;

    /// Retrieve every expense ordered by date, then ID.
    ///
    /// Records that cannot be read, e.g. because of a malformed date, are
    /// skipped instead of failing the whole read.
    fn all(&self) -> Result<Vec<Expense>, Error>;

    /// Get the number of expenses in the store.
    fn count(&self) -> Result<usize, Error>;
}
