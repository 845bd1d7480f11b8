pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use extractors::AuthenticatedUserId;
pub use middleware::{session_token, session_tokens, AuthMiddleware, SESSION_COOKIE};
pub use password::{hash_password, verify_against_placeholder, verify_password};
pub use session::{MemorySessionStore, Session, SessionExpiry, SessionStore};

/// Body returned by a successful login. The token is also set as the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
    /// `false` when the cookie ends with the browser session.
    pub persistent: bool,
}

/// Body returned by a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i32,
}
