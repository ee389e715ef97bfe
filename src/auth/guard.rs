//! Per-request identity resolution and ownership enforcement.
//!
//! A request moves through `Unauthenticated → Authenticated → Authorized`.
//! Any failure to reach `Authenticated` is an early `InvalidCredentials`.
//! The owner check only runs for mutating operations; reads stop at
//! `Authenticated`.

use super::{AuthError, TokenCodec};
use crate::error::AppError;
use crate::models::Account;
use crate::store::AccountStore;
use chrono::{DateTime, Utc};

/// A resource that records the account which created it.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

/// Resolves a bearer token to the account it names.
///
/// A token that fails verification and a valid token whose account no
/// longer exists both yield `InvalidCredentials`. Store failures propagate
/// unchanged.
pub async fn authenticate(
    accounts: &dyn AccountStore,
    codec: &TokenCodec,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Account, AppError> {
    let account_id = codec
        .verify(token, now)
        .map_err(|_| AuthError::InvalidCredentials)?;

    match accounts.find_by_id(account_id).await? {
        Some(account) => Ok(account),
        None => {
            log::debug!("Token names account {} which no longer exists", account_id);
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

/// Permits the caller only if it owns `resource`.
pub fn authorize_owner<R: Owned + ?Sized>(account: &Account, resource: &R) -> Result<(), AuthError> {
    if resource.owner_id() == account.id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
