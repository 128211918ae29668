//! # Schoolhouse Config
//!
//! Configuration structures loaded once from environment variables at process
//! start and shared read-only afterwards:
//!
//! - [`jwt`]: token signing configuration (the signing key is mandatory)
//! - [`database`]: document store connection settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listener address and startup behaviour
//!
//! Every `from_env` constructor has a `from_lookup` twin that takes a variable
//! lookup function, so configuration can be built without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use schoolhouse_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?; // fails when JWT_SECRET is missing
//! let database_config = DatabaseConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cors;
pub mod database;
pub mod error;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads an environment variable, treating unset and non-unicode values alike.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses an optional variable, falling back to `default` when it is unset.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: value.clone(),
        }),
        None => Ok(default),
    }
}
