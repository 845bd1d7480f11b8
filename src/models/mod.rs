pub mod date;
pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskPatch};
pub use user::{LoginRequest, RegisterRequest, User};
