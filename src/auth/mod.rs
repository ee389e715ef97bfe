pub mod extractors;
pub mod flow;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::CurrentAccount;
pub use flow::login;
pub use guard::{authenticate, authorize_owner, Owned};
pub use middleware::AuthMiddleware;
pub use password::CredentialHasher;
pub use token::{TokenClaims, TokenCodec};

/// Token kind label returned alongside every issued token.
pub const TOKEN_TYPE: &str = "bearer";

/// Failures of the authentication and authorization core.
///
/// `InvalidToken` never leaves this module on its own: the guard folds it
/// into `InvalidCredentials`, so an outside caller cannot tell a forged
/// token from an expired one or from a token naming a deleted account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Could not validate credentials")]
    InvalidCredentials,
    #[error("Not authorized to perform requested action")]
    Forbidden,
    #[error("Password {0}")]
    MalformedSecret(&'static str),
    #[error("Failed to issue token: {0}")]
    TokenIssue(String),
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}
