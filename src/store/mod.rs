//! Persistence behind the HTTP handlers.
//!
//! Handlers receive a `web::Data<dyn Repository>`; [`PgRepository`] is the production
//! backend and [`MemoryRepository`] serves local runs without PostgreSQL and the tests.
//! Every task query is scoped to the owning user.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, User};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Message attached to `username` when the name is already held.
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Answer for a task write whose session outlived its user.
pub const OWNER_MISSING: &str = "Session user no longer exists.";

#[async_trait]
pub trait Repository: Send + Sync {
    /// Stores a new user. A taken username is a validation error on `username`.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Tasks of `user_id` dated exactly `date`, in insertion order.
    async fn tasks_on(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError>;

    /// Tasks of `user_id` dated strictly before `date` and not completed, in insertion order.
    async fn pending_before(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError>;

    async fn create_task(&self, user_id: i32, input: &TaskInput) -> Result<Task, AppError>;

    async fn get_task(&self, user_id: i32, task_id: i64) -> Result<Option<Task>, AppError>;

    /// Applies `patch` and returns the updated task, or `None` if the user has no such task.
    async fn update_task(
        &self,
        user_id: i32,
        task_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was deleted.
    async fn delete_task(&self, user_id: i32, task_id: i64) -> Result<bool, AppError>;
}
