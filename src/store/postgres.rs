use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Repository, OWNER_MISSING, USERNAME_TAKEN};
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, User};

const TASK_COLUMNS: &str = "id, text, completed, date, user_id";

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::field("username", USERNAME_TAKEN))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn tasks_on(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND date = $2 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn pending_before(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks
             WHERE user_id = $1 AND date < $2 AND completed = FALSE
             ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn create_task(&self, user_id: i32, input: &TaskInput) -> Result<Task, AppError> {
        let result = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (text, completed, date, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&input.text)
        .bind(input.completed)
        .bind(input.date)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(task) => Ok(task),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(AppError::Unauthorized(OWNER_MISSING.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_task(&self, user_id: i32, task_id: i64) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: i32,
        task_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        // NULL parameters keep the stored value.
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET text = COALESCE($1, text),
                 completed = COALESCE($2, completed),
                 date = COALESCE($3, date)
             WHERE id = $4 AND user_id = $5
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(patch.text.as_deref())
        .bind(patch.completed)
        .bind(patch.date)
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, user_id: i32, task_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
