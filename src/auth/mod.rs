//! Password log-in and session handling.
//!
//! The application has a single user whose password is set with the
//! `set_password` binary. Logging in creates a session in an encrypted
//! cookie, which [auth_guard] checks on every protected route.

mod log_in;
mod log_out;
mod middleware;
mod password;
mod session;
mod user;

pub use log_in::post_log_in;
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use session::DEFAULT_SESSION_DURATION;
pub use user::{OWNER_ID, User, UserID, create_user_table, get_user_by_id, set_password};
