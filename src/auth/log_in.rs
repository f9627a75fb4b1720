//! The route handler for logging in with the application password.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{OWNER_ID, get_user_by_id, session::set_session_cookie},
    extract::ValidJson,
};

/// How long the session should last if the user selects "remember me" at log-in.
const REMEMBER_ME_SESSION_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which a new session is valid.
    pub session_duration: Duration,
    /// The connection to the database holding the password hash.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The JSON body of a log-in request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogInData {
    /// The password entered by the user.
    pub password: String,
    /// Whether the session should last for a week instead of the default duration.
    #[serde(default)]
    pub remember_me: bool,
}

/// Handler for log-in requests.
///
/// On success, a session cookie is set.
///
/// # Errors
///
/// This function will return an error if:
/// - the password has not been set, or is not correct,
/// - the database could not be read,
/// - or an internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    ValidJson(data): ValidJson<LogInData>,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::UpstreamUnavailable("could not acquire the database lock".to_owned())
        })?;

        match get_user_by_id(OWNER_ID, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::warn!("Log in attempted before a password was set.");
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user
        .password_hash
        .verify(&data.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    let session_duration = if data.remember_me {
        REMEMBER_ME_SESSION_DURATION
    } else {
        state.session_duration
    };

    let jar = set_session_cookie(jar, user.id, session_duration)
        .map_err(|error| Error::SessionError(error.to_string()))?;

    tracing::info!("User {} logged in", user.id);

    Ok((jar, Json(json!({ "detail": "Logged in" }))))
}
