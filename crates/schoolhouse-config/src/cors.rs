use crate::env_lookup;

/// Origins allowed to make credentialed cross-origin requests.
///
/// `ALLOWED_ORIGINS` is a comma-separated list of exact origins. A `*` entry
/// is ignored: credentialed CORS cannot use a wildcard origin.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "*")
            .collect();

        Self { allowed_origins }
    }
}
