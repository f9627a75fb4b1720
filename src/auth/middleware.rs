//! Authentication middleware that validates the session cookie and extends active sessions.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState, Error,
    auth::session::{extend_session, get_session},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far an active session's expiry is pushed out on each request.
    pub session_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
///
/// The user ID is placed into the request extensions and the request is run
/// normally if the session is valid, otherwise a 401 Unauthorized JSON error
/// is returned. The session expiry is extended on the way out.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match get_session(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("Rejecting request to {}: {error}", request.uri().path());
            return Error::Unauthenticated.into_response();
        }
    };

    request.extensions_mut().insert(session.user_id);
    let response = next.run(request).await;

    match extend_session(jar, state.session_duration) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("Error extending session: {error}. Leaving the session unchanged.");
            response
        }
    }
}
