#![doc = "The `task_calendar` library crate."]
#![doc = ""]
#![doc = "Domain models, validation, session authentication, persistence and routing for the"]
#![doc = "task calendar backend. The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use error::AppError;
