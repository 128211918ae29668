use crate::{ConfigError, env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Create the default administrator account when the server starts.
    pub seed_on_startup: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            seed_on_startup: lookup("SEED_ON_STARTUP")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert!(!config.seed_on_startup);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("8080".into()),
            "SEED_ON_STARTUP" => Some("TRUE".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.seed_on_startup);
    }

    #[test]
    fn test_bad_port() {
        assert!(ServerConfig::from_lookup(|key| (key == "PORT").then(|| "99999".into())).is_err());
    }
}
