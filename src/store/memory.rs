use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, TaskStore};
use crate::error::{AppError, OWNER_MISSING};
use crate::models::{Account, Task, TaskQuery, TaskUpdate};

#[derive(Default)]
struct AccountTable {
    last_id: i32,
    rows: HashMap<i32, Account>,
}

/// Non-durable store kept in process memory.
///
/// Locks are always taken accounts-then-tasks.
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<AccountTable>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account, AppError> {
        let mut table = self.accounts.write().await;
        if table.rows.values().any(|account| account.email == email) {
            return Err(AppError::BadRequest("Email already registered".into()));
        }

        table.last_id += 1;
        let account = Account {
            id: table.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        table.rows.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let table = self.accounts.read().await;
        Ok(table.rows.values().find(|account| account.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.read().await.rows.get(&id).cloned())
    }

    async fn delete_account(&self, id: i32) -> Result<bool, AppError> {
        let mut table = self.accounts.write().await;
        if table.rows.remove(&id).is_none() {
            return Ok(false);
        }
        self.tasks.write().await.retain(|_, task| task.owner_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        // Held across the insert so a concurrent delete_account cannot orphan the task.
        let accounts = self.accounts.read().await;
        if !accounts.rows.contains_key(&task.owner_id) {
            return Err(AppError::BadRequest(OWNER_MISSING.into()));
        }
        self.tasks.write().await.insert(task.id, task.clone());
        drop(accounts);
        Ok(task.clone())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| task.owner_id == owner_id && task.matches(query))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_task(
        &self,
        id: Uuid,
        changes: &TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.get_mut(&id).map(|task| {
            task.apply(changes, now);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}
