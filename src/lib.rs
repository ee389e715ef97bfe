#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Bearer-token authentication, owner-gated task management, storage backends,"]
#![doc = "routing configuration and error handling for the tasktrack service."]
#![doc = "The binary (`main.rs`) only reads configuration and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
