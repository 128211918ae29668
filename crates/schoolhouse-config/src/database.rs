use crate::{ConfigError, env_lookup, parse_or};

/// Which document store backend `DATABASE_URL` selects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, contents are lost on restart.
    Memory,
    Postgres(String),
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Loads `DATABASE_URL` (`memory` or a `postgres://` URL) and
    /// `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let url = url.trim();

        let backend = if url.eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            StoreBackend::Postgres(url.to_string())
        } else if url.is_empty() {
            return Err(ConfigError::Empty("DATABASE_URL"));
        } else {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "<unsupported scheme>".to_string(),
            });
        };

        Ok(Self {
            backend,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }

    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            max_connections: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let config = DatabaseConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("memory".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_postgres_backend() {
        let config = DatabaseConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://u:p@localhost/school".to_string()),
            "DATABASE_MAX_CONNECTIONS" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::Postgres("postgres://u:p@localhost/school".to_string())
        );
        assert_eq!(config.max_connections, 4);
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let result = DatabaseConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("mongodb://localhost".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_url() {
        let result = DatabaseConfig::from_lookup(|_| None);
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }
}
