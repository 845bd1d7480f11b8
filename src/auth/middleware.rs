use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::session::{Session, SessionStore};
use crate::error::AppError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Reads the session token from the session cookie, falling back to a bearer header.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    cookie_token(req).or_else(|| bearer_token(req))
}

/// Every distinct token the request carries, cookie first.
pub fn session_tokens(req: &HttpRequest) -> Vec<String> {
    let mut tokens: Vec<String> = cookie_token(req).into_iter().collect();
    if let Some(bearer) = bearer_token(req) {
        if !tokens.contains(&bearer) {
            tokens.push(bearer);
        }
    }
    tokens
}

/// Rejects requests without a live session and stores the session in request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    service.call(req).await
                }
                Err(app_err) => Err(app_err.into()),
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<Session, AppError> {
    let store = req
        .app_data::<web::Data<dyn SessionStore>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Session store is not configured".into()))?;

    let token = session_token(req.request()).ok_or_else(|| {
        AppError::Unauthorized("Authentication credentials were not provided.".into())
    })?;

    store
        .get(&token)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session expired or invalid.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_session_token_prefers_cookie() {
        let req = test::TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(session_token(&req).as_deref(), Some("from-cookie"));
    }

    #[::core::prelude::v1::test]
    fn test_session_token_from_bearer_header() {
        let req = test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(session_token(&req).as_deref(), Some("abc123"));

        let req = test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc123"))
            .to_http_request();
        assert_eq!(session_token(&req), None);

        let req = test::TestRequest::default().to_http_request();
        assert_eq!(session_token(&req), None);
    }

    #[::core::prelude::v1::test]
    fn test_session_tokens_lists_cookie_and_bearer() {
        let req = test::TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "stale"))
            .insert_header((header::AUTHORIZATION, "Bearer live"))
            .to_http_request();
        assert_eq!(session_tokens(&req), vec!["stale".to_string(), "live".to_string()]);

        let req = test::TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "same"))
            .insert_header((header::AUTHORIZATION, "Bearer same"))
            .to_http_request();
        assert_eq!(session_tokens(&req), vec!["same".to_string()]);

        let req = test::TestRequest::default().to_http_request();
        assert!(session_tokens(&req).is_empty());
    }
}
