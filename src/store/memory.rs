use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Repository, OWNER_MISSING, USERNAME_TAKEN};
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, User};

#[derive(Default)]
struct State {
    users: Vec<User>,
    // Keyed by id, so iteration follows insertion order.
    tasks: BTreeMap<i64, Task>,
    next_user_id: i32,
    next_task_id: i64,
}

/// In-process repository with the same observable behavior as [`super::PgRepository`].
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Removes a user together with every task they own.
    pub async fn delete_user(&self, user_id: i32) -> bool {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        state.tasks.retain(|_, t| t.user_id != user_id);
        state.users.len() != before
    }

    async fn select<F>(&self, filter: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.state
            .read()
            .await
            .tasks
            .values()
            .filter(|task| filter(task))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == username) {
            return Err(AppError::field("username", USERNAME_TAKEN));
        }
        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn tasks_on(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError> {
        Ok(self
            .select(|t| t.user_id == user_id && t.date == date)
            .await)
    }

    async fn pending_before(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Task>, AppError> {
        Ok(self
            .select(|t| t.user_id == user_id && t.is_pending_at(date))
            .await)
    }

    async fn create_task(&self, user_id: i32, input: &TaskInput) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::Unauthorized(OWNER_MISSING.into()));
        }
        state.next_task_id += 1;
        let task = Task::new(state.next_task_id, input.clone(), user_id);
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, user_id: i32, task_id: i64) -> Result<Option<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn update_task(
        &self,
        user_id: i32,
        task_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        match state.tasks.get_mut(&task_id) {
            Some(task) if task.user_id == user_id => {
                task.apply(patch);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, user_id: i32, task_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let owned = state
            .tasks
            .get(&task_id)
            .map_or(false, |t| t.user_id == user_id);
        if owned {
            state.tasks.remove(&task_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(text: &str, completed: bool, date: NaiveDate) -> TaskInput {
        TaskInput {
            text: text.to_string(),
            completed,
            date,
        }
    }

    async fn repo_with_user() -> (MemoryRepository, i32) {
        let repo = MemoryRepository::new();
        let user = repo.create_user("alice", "hash").await.unwrap();
        (repo, user.id)
    }

    #[actix_rt::test]
    async fn test_duplicate_username_is_field_error() {
        let (repo, _) = repo_with_user().await;
        match repo.create_user("alice", "other").await {
            Err(AppError::ValidationError(fields)) => {
                assert_eq!(fields["username"], vec![USERNAME_TAKEN.to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(repo.user_count().await, 1);
    }

    #[actix_rt::test]
    async fn test_tasks_on_matches_exact_date() {
        let (repo, uid) = repo_with_user().await;
        let a = repo.create_task(uid, &input("a", false, day(2024, 5, 1))).await.unwrap();
        repo.create_task(uid, &input("b", false, day(2024, 5, 2))).await.unwrap();
        let c = repo.create_task(uid, &input("c", true, day(2024, 5, 1))).await.unwrap();

        let found = repo.tasks_on(uid, day(2024, 5, 1)).await.unwrap();
        assert_eq!(found, vec![a, c]);
        assert!(repo.tasks_on(uid, day(2030, 1, 1)).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_pending_before_predicate() {
        let (repo, uid) = repo_with_user().await;
        let early_open = repo.create_task(uid, &input("open", false, day(2024, 1, 1))).await.unwrap();
        repo.create_task(uid, &input("done", true, day(2024, 1, 1))).await.unwrap();
        repo.create_task(uid, &input("today", false, day(2024, 1, 10))).await.unwrap();
        repo.create_task(uid, &input("later", false, day(2024, 2, 1))).await.unwrap();

        let pending = repo.pending_before(uid, day(2024, 1, 10)).await.unwrap();
        assert_eq!(pending, vec![early_open]);
    }

    #[actix_rt::test]
    async fn test_tasks_are_scoped_to_owner() {
        let (repo, alice) = repo_with_user().await;
        let bob = repo.create_user("bob", "hash").await.unwrap().id;
        let task = repo.create_task(alice, &input("mine", false, day(2024, 1, 1))).await.unwrap();

        assert_eq!(repo.get_task(bob, task.id).await.unwrap(), None);
        assert!(repo.tasks_on(bob, day(2024, 1, 1)).await.unwrap().is_empty());
        assert!(repo.pending_before(bob, day(2024, 2, 1)).await.unwrap().is_empty());
        assert_eq!(
            repo.update_task(bob, task.id, &TaskPatch::default()).await.unwrap(),
            None
        );
        assert!(!repo.delete_task(bob, task.id).await.unwrap());
        assert_eq!(repo.get_task(alice, task.id).await.unwrap(), Some(task));
    }

    #[actix_rt::test]
    async fn test_update_and_delete() {
        let (repo, uid) = repo_with_user().await;
        let task = repo.create_task(uid, &input("a", false, day(2024, 1, 1))).await.unwrap();

        let patch = TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        };
        let updated = repo.update_task(uid, task.id, &patch).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.text, "a");
        assert_eq!(updated.date, day(2024, 1, 1));

        assert!(repo.delete_task(uid, task.id).await.unwrap());
        assert!(!repo.delete_task(uid, task.id).await.unwrap());
        assert_eq!(repo.get_task(uid, task.id).await.unwrap(), None);
        assert_eq!(repo.update_task(uid, task.id, &patch).await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_deleting_user_cascades_to_tasks() {
        let (repo, uid) = repo_with_user().await;
        let task = repo.create_task(uid, &input("a", false, day(2024, 1, 1))).await.unwrap();

        assert!(repo.delete_user(uid).await);
        assert_eq!(repo.get_task(uid, task.id).await.unwrap(), None);
        match repo.create_task(uid, &input("b", false, day(2024, 1, 1))).await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, OWNER_MISSING),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_ids_are_never_reused() {
        let (repo, uid) = repo_with_user().await;
        let first = repo.create_task(uid, &input("a", false, day(2024, 1, 1))).await.unwrap();
        repo.delete_task(uid, first.id).await.unwrap();
        let second = repo.create_task(uid, &input("b", false, day(2024, 1, 1))).await.unwrap();
        assert!(second.id > first.id);
    }
}
