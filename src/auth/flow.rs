use super::{AccessToken, AuthError, CredentialHasher, TokenCodec};
use crate::error::AppError;
use crate::store::AccountStore;
use chrono::{DateTime, Utc};

/// Exchanges an email and password for a bearer token.
///
/// An unknown email and a wrong password fail with the same
/// `InvalidCredentials`, and both run one bcrypt comparison.
pub async fn login(
    accounts: &dyn AccountStore,
    hasher: &CredentialHasher,
    codec: &TokenCodec,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<AccessToken, AppError> {
    let account = match accounts.find_by_email(email).await? {
        Some(account) => account,
        None => {
            hasher.verify_dummy(password);
            log::warn!("Rejected login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    if !hasher.verify(password, &account.password_hash) {
        log::warn!("Rejected login attempt");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = codec.issue(account.id, now)?;
    log::debug!("Issued token for account {}", account.id);
    Ok(AccessToken::bearer(token))
}
