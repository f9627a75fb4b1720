//! Expense Tracker is a small web service for recording personal expenses.
//!
//! This library provides a JSON REST API for creating and editing expenses,
//! summarising them by month, ISO week and category, forecasting next month's
//! spending and checking spending against a monthly budget.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod extract;
mod forecast;
mod logging;
mod not_found;
mod pagination;
mod period;
mod routing;
mod stores;
mod summary;
mod timezone;

pub use app_state::{AppState, BudgetConfig};
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, get_user_by_id, set_password};
pub use budget::{BudgetPreview, BudgetStatus, SavingsProgress, evaluate, preview, savings_progress};
pub use database_id::ExpenseId;
pub use db::initialize as initialize_db;
pub use expense::{Expense, MAX_AMOUNT, NewExpense, suggest_category};
pub use forecast::{ForecastMethod, ForecastPoint, forecast};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use period::{MonthKey, WeekKey, month_key, week_key};
pub use routing::build_router;
pub use stores::{ExpenseStore, SQLiteExpenseStore};
pub use summary::{
    Bucket, CategoryTotal, CumulativePoint, DateRange, MonthlyBucket, WeeklyBucket, by_category,
    cumulative, monthly, weekly,
};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A request was missing a required field, had an unknown field, or had
    /// a field with an invalid value.
    ///
    /// The string describes the problem and is safe to show to the client.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A collaborator (the database or the category suggester) could not be
    /// reached.
    ///
    /// The string is a short, client-facing description such as
    /// "forecast unavailable".
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// The user provided an incorrect password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired session.
    #[error("you must be logged in to access this resource")]
    Unauthenticated,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A session cookie could not be created.
    #[error("could not create session: {0}")]
    SessionError(String),

    /// Adding up amounts went past the largest representable decimal.
    ///
    /// Amounts are bounded by [MAX_AMOUNT] on the way in, so this only
    /// happens when the database holds amounts written by other tools.
    #[error("the total of the amounts is too large to calculate")]
    AmountOverflow,

    /// An error occurred while writing expenses as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(ref sql_error, _)
                if matches!(
                    sql_error.code,
                    rusqlite::ErrorCode::DatabaseBusy
                        | rusqlite::ErrorCode::DatabaseLocked
                        | rusqlite::ErrorCode::CannotOpen
                ) =>
            {
                tracing::error!("the database is unavailable: {value}");
                Error::UpstreamUnavailable("the database is unavailable".to_owned())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Expense not found".to_owned()),
            Error::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Error::UpstreamUnavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect password.".to_owned())
            }
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "You must be logged in to access this resource.".to_owned(),
            ),
            Error::InvalidTimezoneError(timezone) => {
                tracing::error!("Could not get local timezone \"{timezone}\"");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                )
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
