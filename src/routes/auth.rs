use crate::{
    auth::{
        hash_password, session_tokens, verify_against_placeholder, verify_password,
        LoginResponse, RegisterResponse, Session, SessionExpiry, SessionStore, SESSION_COOKIE,
    },
    config::Config,
    error::AppError,
    models::{LoginRequest, RegisterRequest},
    store::Repository,
};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Same answer for an unknown user and a wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Register a new user
///
/// Validates the username length and the password confirmation before anything is
/// hashed or stored. `confirm_password` is never persisted.
///
/// ## Responses:
/// - `201 Created`: `{"message", "user_id"}`.
/// - `400 Bad Request`: malformed JSON, or field errors for `username` / `confirm_password`.
#[post("/register")]
pub async fn register(
    repo: web::Data<dyn Repository>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let password_hash = hash_password(&register_data.password, config.bcrypt_cost)?;
    let user = repo
        .create_user(&register_data.username, &password_hash)
        .await?;

    log::info!("Registered user {} (id {})", user.username, user.id);
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".into(),
        user_id: user.id,
    }))
}

/// Login user
///
/// Authenticates the credentials and opens a session. Without `remember_me` the cookie
/// has no expiry and dies with the browser; with it the cookie and the session last
/// seven days.
///
/// ## Responses:
/// - `200 OK`: `LoginResponse`, plus the `sessionid` cookie.
/// - `400 Bad Request`: missing fields or invalid credentials.
#[post("/login")]
pub async fn login(
    repo: web::Data<dyn Repository>,
    sessions: web::Data<dyn SessionStore>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    if login_data.validate().is_err() {
        return Err(AppError::BadRequest(
            "Username and password are required.".into(),
        ));
    }

    let user = match repo.find_user_by_username(&login_data.username).await? {
        Some(user) => user,
        None => {
            verify_against_placeholder(&login_data.password, config.bcrypt_cost);
            log::warn!("Login rejected: unknown user {:?}", login_data.username);
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
        }
    };
    if !verify_password(&login_data.password, &user.password_hash)? {
        log::warn!("Login rejected: wrong password for user {}", user.id);
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let session = sessions
        .create(user.id, SessionExpiry::from_remember_me(login_data.remember_me))
        .await;
    log::info!(
        "User {} logged in (persistent session: {})",
        user.id,
        session.is_persistent()
    );

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session, config.session_cookie_secure))
        .json(LoginResponse {
            message: "Login Successful".into(),
            token: session.token.clone(),
            user_id: user.id,
            expires_at: session.expires_at,
            persistent: session.is_persistent(),
        }))
}

/// Logout user
///
/// Invalidates every session the request carries (cookie and bearer token) and clears
/// the cookie. Succeeds even when there is no session.
#[post("/logout")]
pub async fn logout(req: HttpRequest, sessions: web::Data<dyn SessionStore>) -> impl Responder {
    for token in session_tokens(&req) {
        if sessions.remove(&token).await {
            log::info!("Session closed by logout");
        }
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok()
        .cookie(removal)
        .json(json!({ "message": "Logged out successfully" }))
}

fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(seconds) = session.expiry.cookie_max_age() {
        builder = builder.max_age(CookieDuration::seconds(seconds));
    }
    builder.finish()
}
