//! Contains the SQLite backed store implementations.

pub mod expense;

pub use expense::SQLiteExpenseStore;
