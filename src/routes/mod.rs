pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every API route. `/tasks` requires a live session.
///
/// The application must provide `web::Data<dyn Repository>`, `web::Data<dyn SessionStore>`
/// and `web::Data<Config>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(auth::register)
    .service(auth::login)
    .service(auth::logout)
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::create_task)
            .service(tasks::pending_tasks)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::tasks_by_date),
    );
}
