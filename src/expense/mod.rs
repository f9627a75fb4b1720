//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the validated `NewExpense` fields
//! - The expense table schema and row mapping
//! - Route handlers for creating, listing, editing, deleting and exporting expenses
//! - Category suggestions based on past expenses

mod core;
mod export;
mod handlers;
mod suggest;

use axum::extract::FromRef;

use crate::{AppState, stores::SQLiteExpenseStore};

pub use self::core::{
    Expense, ExpenseForm, MAX_AMOUNT, NewExpense, create_expense_table, map_expense_row,
    validate_amount,
};
pub use export::export_expenses;
pub use handlers::{
    create_expense, delete_expense, get_expense, get_suggested_category,
    list_expenses, update_expense,
};
pub use suggest::suggest_category;

/// The state needed to read and write expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The store for managing expenses.
    pub expense_store: SQLiteExpenseStore,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}
