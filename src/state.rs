use std::sync::Arc;

use crate::auth::{CredentialHasher, TokenCodec};
use crate::config::{AuthSettings, Config};
use crate::error::AppError;
use crate::store::{AccountStore, MemoryStore, PgStore, TaskStore};

/// Everything a handler needs, shared across workers through `web::Data`.
pub struct AppState {
    pub codec: TokenCodec,
    pub hasher: CredentialHasher,
    pub accounts: Arc<dyn AccountStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        auth: &AuthSettings,
        accounts: Arc<dyn AccountStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            codec: TokenCodec::new(auth),
            hasher: CredentialHasher::new(auth.bcrypt_cost)?,
            accounts,
            tasks,
        })
    }

    pub fn in_memory(auth: &AuthSettings) -> Result<Self, AppError> {
        let store = Arc::new(MemoryStore::default());
        Self::new(auth, store.clone(), store)
    }

    /// Picks PostgreSQL when `DATABASE_URL` is set, memory otherwise.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await?);
                log::info!("Connected to PostgreSQL");
                Self::new(&config.auth, store.clone(), store)
            }
            None => {
                log::warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
                Self::in_memory(&config.auth)
            }
        }
    }
}
