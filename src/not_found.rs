//! The fallback handler for unknown routes.

use axum::response::{IntoResponse, Response};

use crate::Error;

/// Respond with a 404 Not Found JSON error.
pub async fn get_404_not_found() -> Response {
    tracing::debug!("No route matched the request.");

    Error::NotFound.into_response()
}
