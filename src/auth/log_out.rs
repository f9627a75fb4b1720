//! Log-out route handler that invalidates the session cookie.

use axum::{Json, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::auth::session::invalidate_session_cookie;

/// Invalidate the session cookie.
///
/// Logging out without a session is not an error.
pub async fn post_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (
        invalidate_session_cookie(jar),
        Json(json!({ "detail": "Logged out" })),
    )
}
