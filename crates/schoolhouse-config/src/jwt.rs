use crate::{ConfigError, env_lookup, parse_or};

/// Tokens are valid for 30 days from issuance.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry: i64,
}

impl JwtConfig {
    /// Loads `JWT_SECRET` and `JWT_EXPIRY`.
    ///
    /// There is no fallback key: a missing or blank `JWT_SECRET` is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }

        let token_expiry = parse_or(&lookup, "JWT_EXPIRY", DEFAULT_TOKEN_EXPIRY_SECS)?;
        if token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                value: token_expiry.to_string(),
            });
        }

        Ok(Self {
            secret,
            token_expiry,
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = JwtConfig::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let result = JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::Empty("JWT_SECRET"));
    }

    #[test]
    fn test_default_expiry_is_thirty_days() {
        let config = JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.token_expiry, 2_592_000);
    }

    #[test]
    fn test_invalid_expiry() {
        let result =
            JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret"), ("JWT_EXPIRY", "soon")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "JWT_EXPIRY", .. })));

        let result =
            JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret"), ("JWT_EXPIRY", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "top-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
