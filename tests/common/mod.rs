#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use task_calendar::auth::{MemorySessionStore, SessionStore, SESSION_COOKIE};
use task_calendar::config::Config;
use task_calendar::models::Task;
use task_calendar::routes::{self, health};
use task_calendar::store::{MemoryRepository, Repository};

pub const PASSWORD: &str = "Password123!";

/// Stores shared between the app under test and the assertions.
pub struct TestContext {
    pub repo: Arc<MemoryRepository>,
    pub sessions: Arc<MemorySessionStore>,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config {
            bcrypt_cost: 4,
            session_idle_seconds: 3600,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            repo: Arc::new(MemoryRepository::new()),
            sessions: Arc::new(MemorySessionStore::from_config(&config)),
            config,
        }
    }

    pub fn repo_data(&self) -> web::Data<dyn Repository> {
        let repo: Arc<dyn Repository> = self.repo.clone();
        web::Data::from(repo)
    }

    pub fn sessions_data(&self) -> web::Data<dyn SessionStore> {
        let sessions: Arc<dyn SessionStore> = self.sessions.clone();
        web::Data::from(sessions)
    }
}

pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(ctx.repo_data())
            .app_data(ctx.sessions_data())
            .app_data(web::Data::new(ctx.config.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config),
    )
    .await
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> (actix_web::http::StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "username": username,
            "password": password,
            "confirm_password": confirm_password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Logs in and returns the session cookie, panicking with the response body on failure.
pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
    remember_me: bool,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({
            "username": username,
            "password": password,
            "remember_me": remember_me
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let cookie = session_cookie(&resp);
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    cookie.expect("login response should set the session cookie")
}

pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> Cookie<'static> {
    let (status, body) = register(app, username, PASSWORD, PASSWORD).await;
    assert!(status.is_success(), "Failed to register {}: {}", username, body);
    login(app, username, PASSWORD, false).await
}

pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    cookie: &Cookie<'static>,
    payload: Value,
) -> Task {
    let req = test::TestRequest::post()
        .uri("/tasks/")
        .cookie(cookie.clone())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(resp).await
}

pub async fn get_tasks(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    cookie: &Cookie<'static>,
    uri: &str,
) -> Vec<Task> {
    let req = test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "GET {}", uri);
    test::read_body_json(resp).await
}
