//! Creates the application's tables in a SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, auth::create_user_table, expense::create_expense_table};

/// Create the tables for the domain models if they do not already exist.
///
/// All tables are created in a single exclusive transaction, so either every
/// table exists afterwards or none of the changes are kept.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
