use super::AuthError;
use bcrypt::{hash, verify, BcryptError};

/// bcrypt only reads the first 72 bytes of its input.
const MAX_PASSWORD_BYTES: usize = 72;

/// One-way password hashing with bcrypt at a fixed cost.
pub struct CredentialHasher {
    cost: u32,
    // Hash of a throwaway secret, compared against when the login
    // identifier is unknown so both failure paths cost one bcrypt run.
    dummy_hash: String,
}

impl CredentialHasher {
    /// Fails only when `cost` is outside bcrypt's accepted range.
    pub fn new(cost: u32) -> Result<Self, BcryptError> {
        let dummy_hash = hash("tasktrack-dummy-credential", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::MalformedSecret("must not be empty"));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::MalformedSecret("must be at most 72 bytes"));
        }
        hash(password, self.cost).map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AuthError::MalformedSecret("could not be hashed")
        })
    }

    /// Returns `false` for a mismatch and for a stored hash bcrypt cannot parse.
    ///
    /// Input longer than 72 bytes never matches. bcrypt would otherwise
    /// compare only its prefix.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            self.verify_dummy(password);
            return false;
        }
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Stored password hash could not be checked: {}", e);
                false
            }
        }
    }

    pub fn verify_dummy(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }
}
