//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type shared by handlers, the repository and the
//! session layer. Every failure a request can hit is one of its variants, and the
//! `actix_web::error::ResponseError` implementation is the only place where error kinds
//! become HTTP status codes.
//!
//! Server-side failures are logged with their detail but answered with a generic body,
//! so database messages never reach the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

/// Body sent for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Field name mapped to the messages raised for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid session (HTTP 401).
    Unauthorized(String),
    /// Malformed request: bad date format, bad JSON, rejected credentials (HTTP 400).
    BadRequest(String),
    /// The requested task does not exist for the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the database driver (HTTP 500).
    DatabaseError(String),
    /// Field-scoped validation failure (HTTP 400).
    ValidationError(FieldErrors),
}

impl AppError {
    /// Builds a validation error carrying a single message for `field`.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::ValidationError(errors)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(fields) => {
                write!(f, "Validation Error: ")?;
                let mut first = true;
                for (field, messages) in fields {
                    if !first {
                        write!(f, "; ")?;
                    }
                    first = false;
                    write!(f, "{}: {}", field, messages.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects with JSON bodies.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
            }
            AppError::ValidationError(fields) => HttpResponse::BadRequest().json(json!({
                "error": "Invalid input",
                "details": fields
            })),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({ "error": INTERNAL_ERROR_MESSAGE }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is a database failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into a field-scoped `AppError::ValidationError`.
///
/// Rules declared with a `message` keep it; the others fall back to the rule code.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value ({})", e.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        AppError::ValidationError(fields)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
