use super::AuthError;
use crate::config::AuthSettings;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The claims carried by every bearer token.
///
/// The shape is fixed: decoding rejects payloads with extra fields, so a
/// token minted by another service sharing the secret is not accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TokenClaims {
    /// Subject of the token: the account id in decimal.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies signed, expiring bearer tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            algorithm: settings.algorithm,
            ttl: settings.token_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a token for `subject` that expires `ttl` after `now`.
    pub fn issue(&self, subject: i32, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Checks signature, shape and expiry, returning the subject on success.
    ///
    /// Every failure is reported as [`AuthError::InvalidToken`]; the cause is
    /// only written to the debug log.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<i32, AuthError> {
        // Expiry is checked below against the caller's clock, without leeway.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected token: {}", e);
                AuthError::InvalidToken
            })?;

        if claims.exp <= now.timestamp() {
            log::debug!("Rejected token: expired at {}", claims.exp);
            return Err(AuthError::InvalidToken);
        }

        claims.sub.parse::<i32>().map_err(|_| {
            log::debug!("Rejected token: subject '{}' is not an account id", claims.sub);
            AuthError::InvalidToken
        })
    }
}
