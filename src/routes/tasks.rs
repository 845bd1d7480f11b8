use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{date::parse_date_param, TaskInput, TaskPatch},
    store::Repository,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

const TASK_NOT_FOUND: &str = "Task not found.";

/// Lists the authenticated user's tasks on one calendar day.
///
/// ## Path Parameters:
/// - `date`: `YYYY-MM-DD`.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks dated exactly `date`, possibly empty.
/// - `400 Bad Request`: `date` is not a valid `YYYY-MM-DD` date.
/// - `401 Unauthorized`: no live session.
#[get("/{date}")]
pub async fn tasks_by_date(
    repo: web::Data<dyn Repository>,
    date: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let date = parse_date_param(&date)?;
    let tasks = repo.tasks_on(user.0, date).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `text`: 1 to 2000 characters (required).
/// - `completed` (optional): defaults to `false`.
/// - `date`: `YYYY-MM-DD` (required).
///
/// ## Responses:
/// - `201 Created`: the stored task, including its generated `id`.
/// - `400 Bad Request`: malformed body or validation failure.
#[post("/")]
pub async fn create_task(
    repo: web::Data<dyn Repository>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = repo.create_task(user.0, &task_data).await?;
    log::debug!("User {} created task {}", user.0, task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Fetches one task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `404 Not Found`: no such task for this user.
#[get("/detail/{id}")]
pub async fn get_task(
    repo: web::Data<dyn Repository>,
    task_id: web::Path<i64>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    match repo.get_task(user.0, task_id.into_inner()).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound(TASK_NOT_FOUND.into())),
    }
}

/// Partially updates a task.
///
/// Only the fields present in the body change; validation covers those fields only.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: malformed body or validation failure.
/// - `404 Not Found`: no such task for this user.
#[put("/detail/{id}")]
pub async fn update_task(
    repo: web::Data<dyn Repository>,
    task_id: web::Path<i64>,
    patch: web::Json<TaskPatch>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    match repo.update_task(user.0, task_id.into_inner(), &patch).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound(TASK_NOT_FOUND.into())),
    }
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such task for this user.
#[delete("/detail/{id}")]
pub async fn delete_task(
    repo: web::Data<dyn Repository>,
    task_id: web::Path<i64>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    if !repo.delete_task(user.0, task_id).await? {
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }

    log::debug!("User {} deleted task {}", user.0, task_id);
    Ok(HttpResponse::NoContent().finish())
}

/// Lists pending tasks: dated strictly before `date` and not completed.
///
/// ## Responses:
/// - `200 OK`: JSON array, possibly empty.
/// - `400 Bad Request`: `date` is not a valid `YYYY-MM-DD` date.
#[get("/pending/{date}")]
pub async fn pending_tasks(
    repo: web::Data<dyn Repository>,
    date: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let date = parse_date_param(&date)?;
    let tasks = repo.pending_before(user.0, date).await?;
    Ok(HttpResponse::Ok().json(tasks))
}
