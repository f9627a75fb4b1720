//! Sessions for authenticated clients, stored in an encrypted private cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::auth::UserID;

/// The name of the cookie holding the session.
pub(crate) const COOKIE_SESSION: &str = "session";

/// The default duration a session stays valid without any activity.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::minutes(5);

mod datetime_format {
    //! Serializes a [time::OffsetDateTime] with a fixed width hour so that
    //! times at midnight parse again.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The authenticated state of one client.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Session {
    /// The user the client logged in as.
    pub user_id: UserID,
    /// When the session stops being valid.
    #[serde(with = "datetime_format")]
    pub expires_at: OffsetDateTime,
}

/// The reasons a session cookie may be rejected or not be created.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    /// The request has no session cookie.
    #[error("no session cookie")]
    Missing,
    /// The session cookie could not be decrypted or parsed.
    #[error("malformed session cookie")]
    Malformed,
    /// The session has expired.
    #[error("the session expired at {0}")]
    Expired(OffsetDateTime),
    /// Adding the session duration overflowed the date time.
    #[error("could not calculate the session expiry")]
    DateError,
    /// The session could not be written to JSON.
    #[error("could not serialize the session: {0}")]
    Serialization(String),
}

fn build_cookie(session: &Session) -> Result<Cookie<'static>, SessionError> {
    let value = serde_json::to_string(session)
        .map_err(|error| SessionError::Serialization(error.to_string()))?;

    Ok(Cookie::build((COOKIE_SESSION, value))
        .expires(session.expires_at)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build())
}

/// Add a session for `user_id` to the cookie jar that expires `duration` from now.
///
/// # Errors
///
/// Returns a [SessionError] if the expiry overflows or the session cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, SessionError> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(SessionError::DateError)?;

    let cookie = build_cookie(&Session {
        user_id,
        expires_at,
    })?;

    Ok(jar.add(cookie))
}

/// Get the session from the cookie jar if it has not expired.
///
/// The expiry is read from the encrypted cookie value rather than the
/// cookie's `Expires` attribute, since clients control the latter.
///
/// # Errors
///
/// Returns a [SessionError] if the cookie is missing, malformed or expired.
pub fn get_session(jar: &PrivateCookieJar) -> Result<Session, SessionError> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(SessionError::Missing)?;
    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| SessionError::Malformed)?;

    if session.expires_at <= OffsetDateTime::now_utc() {
        return Err(SessionError::Expired(session.expires_at));
    }

    Ok(session)
}

/// Push the session expiry out to at least `duration` from now.
///
/// Sessions that already expire later, e.g. from "remember me", keep their expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
pub fn extend_session(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, SessionError> {
    let session = get_session(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(SessionError::DateError)?;

    let cookie = build_cookie(&Session {
        user_id: session.user_id,
        expires_at: max(session.expires_at, new_expiry),
    })?;

    Ok(jar.add(cookie))
}

/// Replace the session with an expired cookie, which deletes it on the client.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}
