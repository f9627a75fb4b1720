//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rust_decimal::Decimal;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, auth::DEFAULT_SESSION_DURATION, db::initialize, pagination::PaginationConfig,
    stores::SQLiteExpenseStore, timezone::get_local_offset,
};

/// The default monthly budget and savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetConfig {
    /// The amount the user plans to spend each month.
    pub monthly_budget: Decimal,
    /// The amount the user wants to have left over each month.
    pub savings_goal: Decimal,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            monthly_budget: Decimal::new(1_000_000, 2),
            savings_goal: Decimal::new(500_000, 2),
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration a session stays valid without any activity.
    pub session_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The config that controls how lists of expenses are paged.
    pub pagination_config: PaginationConfig,

    /// The default budget and savings goal.
    pub budget_config: BudgetConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for managing expenses, sharing `db_connection`.
    pub expense_store: SQLiteExpenseStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if `local_timezone` is not a known timezone or the database cannot be
    /// initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        budget_config: BudgetConfig,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            session_duration: DEFAULT_SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            budget_config,
            expense_store: SQLiteExpenseStore::new(connection.clone()),
            db_connection: connection,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
