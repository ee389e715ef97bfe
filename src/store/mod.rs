//! Persistence collaborators.
//!
//! The handlers and the authentication core only see these traits. Two
//! backends implement them: [`PgStore`] on PostgreSQL through `sqlx`, and
//! [`MemoryStore`], a process-local map used when no database is configured
//! and throughout the tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, Task, TaskQuery, TaskUpdate};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. A duplicate email is a `BadRequest`.
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account, AppError>;

    /// Exact, case-sensitive match on the login identifier.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError>;

    /// Removes the account and every task it owns. Returns `false` if absent.
    async fn delete_account(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Tasks owned by `owner_id` matching `query`, newest first.
    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    /// Applies `changes` and returns the stored result, or `None` if the task
    /// disappeared since it was last read.
    async fn update_task(
        &self,
        id: Uuid,
        changes: &TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError>;

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;
}
