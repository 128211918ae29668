use dotenvy::dotenv;
use schoolhouse::logging::init_tracing;
use schoolhouse::metrics::{init_metrics, metrics_app};
use schoolhouse::router::init_router;
use schoolhouse::state::init_app_state;
use schoolhouse_cli::seeder;
use schoolhouse_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _log_guard = init_tracing();

    let server = ServerConfig::from_env()?;
    let state = init_app_state().await.inspect_err(|e| {
        tracing::error!(error = %e, "Startup failed");
    })?;
    tracing::info!(backend = state.store.backend_name(), "Store ready");

    if server.seed_on_startup
        && let Some(admin) = seeder::seed_default_admin(&state.store).await?
    {
        tracing::info!(email = %admin.email, "Seeded default administrator");
    }

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await?;
    Ok(())
}
