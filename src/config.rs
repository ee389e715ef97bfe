use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_ALGORITHM: &str = "HS256";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings consumed by the token codec and the credential hasher.
///
/// Read once at process start and never mutated afterwards. Changing the
/// secret invalidates every token issued under the previous one.
#[derive(Clone)]
pub struct AuthSettings {
    pub secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => DEFAULT_SERVER_PORT,
        };
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());

        let secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let algorithm_name =
            lookup("JWT_ALGORITHM").unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
        let algorithm = parse_algorithm(&algorithm_name)?;

        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("'{}' is not a whole number of minutes", raw),
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        if ttl_minutes < 1 {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: "must be at least 1".to_string(),
            });
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!("'{}' is not a number", raw),
            })?,
            None => DEFAULT_BCRYPT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: "must be between 4 and 31".to_string(),
            });
        }

        Ok(Self {
            database_url,
            server_port,
            server_host,
            auth: AuthSettings {
                secret: secret.into_bytes(),
                algorithm,
                token_ttl: Duration::minutes(ttl_minutes),
                bcrypt_cost,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

// Tokens are signed with a shared secret, so only the HMAC family applies.
fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "JWT_ALGORITHM",
        reason: format!("'{}' is not one of HS256, HS384, HS512", name),
    };
    match Algorithm::from_str(name).map_err(|_| invalid())? {
        algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => Ok(algorithm),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.auth.secret, b"s3cret".to_vec());
        assert_eq!(config.auth.algorithm, Algorithm::HS256);
        assert_eq!(config.auth.token_ttl, Duration::minutes(30));
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_vars(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("JWT_SECRET", "another"),
            ("JWT_ALGORITHM", "HS512"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "90"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://test"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.auth.algorithm, Algorithm::HS512);
        assert_eq!(config.auth.token_ttl, Duration::minutes(90));
        assert_eq!(config.auth.bcrypt_cost, 4);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let err = Config::from_vars(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = Config::from_vars(lookup_from(&[("JWT_SECRET", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_asymmetric_algorithms_are_rejected() {
        for name in ["RS256", "ES256", "EdDSA", "none", "hs256"] {
            let err = Config::from_vars(lookup_from(&[
                ("JWT_SECRET", "s3cret"),
                ("JWT_ALGORITHM", name),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "JWT_ALGORITHM", .. }),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        let cases = [
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "0"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "soon"),
            ("BCRYPT_COST", "3"),
            ("BCRYPT_COST", "32"),
            ("SERVER_PORT", "70000"),
        ];
        for (key, value) in cases {
            let result = Config::from_vars(lookup_from(&[("JWT_SECRET", "s3cret"), (key, value)]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = Config::from_vars(lookup_from(&[("JWT_SECRET", "do-not-print")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("do-not-print"));
        assert!(printed.contains("<redacted>"));
    }
}
