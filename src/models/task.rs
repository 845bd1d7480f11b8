use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::date;

/// Upper bound on a task's text, matching the column width.
pub const MAX_TEXT_LENGTH: u64 = 2000;

/// Payload for creating a task. The owner comes from the session, never the body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 2000 characters.
    #[validate(length(min = 1, max = 2000, message = "Text must be between 1 and 2000 characters."))]
    pub text: String,

    /// Defaults to `false` when omitted.
    #[serde(default)]
    pub completed: bool,

    #[serde(deserialize_with = "date::deserialize")]
    pub date: NaiveDate,
}

/// Partial update. Fields left out (or sent as `null`) keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 2000, message = "Text must be between 1 and 2000 characters."))]
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub completed: Option<bool>,

    #[serde(default, deserialize_with = "date::deserialize_option")]
    pub date: Option<NaiveDate>,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub date: NaiveDate,
    /// Owner; deleting the user deletes the task.
    pub user_id: i32,
}

impl Task {
    pub fn new(id: i64, input: TaskInput, user_id: i32) -> Self {
        Self {
            id,
            text: input.text,
            completed: input.completed,
            date: input.date,
            user_id,
        }
    }

    /// Applies the supplied fields of `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    /// Pending relative to `reference`: strictly earlier and not completed.
    pub fn is_pending_at(&self, reference: NaiveDate) -> bool {
        self.date < reference && !self.completed
    }
}
