use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A stored account. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /register`.
///
/// Missing fields deserialize as empty strings so they surface as field errors.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "Username must be between 1 and 10 characters."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
    /// Only compared against `password`; it is dropped before anything is stored.
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field may not be blank."),
        must_match(other = "password", message = "Passwords must match.")
    )]
    pub confirm_password: String,
}

/// Payload for `POST /login`. Missing credentials read as empty and fail validation.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}
