//! Contains the trait and implementations for objects that store [expenses](crate::Expense).

mod expense;

pub mod sqlite;

pub use expense::ExpenseStore;
pub use sqlite::SQLiteExpenseStore;
