use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::session::Session;
use crate::error::AppError;

/// The user behind the current session.
///
/// Only available on routes wrapped in `AuthMiddleware`, which puts the `Session` into
/// request extensions. Without it the extractor fails with `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>() {
            Some(session) => ready(Ok(AuthenticatedUserId(session.user_id))),
            None => {
                let err = AppError::Unauthorized(
                    "Authentication credentials were not provided.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
