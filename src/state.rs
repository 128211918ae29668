use schoolhouse_auth::TokenService;
use schoolhouse_config::{CorsConfig, DatabaseConfig, JwtConfig};
use schoolhouse_db::Store;

/// Process-wide dependencies, built once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenService, cors_config: CorsConfig) -> Self {
        Self {
            store,
            tokens,
            cors_config,
        }
    }
}

/// Loads configuration from the environment and opens the store.
///
/// Fails when `JWT_SECRET` is missing or empty: the server never signs tokens
/// with a default key.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let tokens = TokenService::new(jwt_config)?;
    let store = Store::connect(&DatabaseConfig::from_env()?).await?;

    Ok(AppState::new(store, tokens, CorsConfig::from_env()))
}
