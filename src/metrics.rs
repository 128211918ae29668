//! Prometheus metrics.
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder, and
//! the whole module can be switched off with `OBSERVABILITY_ENABLED=false`.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const REQUEST_DURATION: &str = "http_request_duration_seconds";
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_observability_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|value| !matches!(value.to_lowercase().as_str(), "false" | "0" | "off"))
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder is already
/// installed in this process.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), LATENCY_BUCKETS)
        .and_then(PrometheusBuilder::install_recorder)
        .map_err(|e| tracing::warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    tracing::info!("Prometheus metrics enabled at /metrics");
    Some(handle)
}

/// Counts requests per route template and status, and records latency.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().to_string();
    // Unmatched requests share one label so random URLs cannot blow up cardinality.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    gauge!("http_requests_active").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_active").decrement(1.0);

    let status = response.status().as_u16().to_string();
    histogram!(REQUEST_DURATION, "method" => method.clone(), "route" => route.clone())
        .record(start.elapsed().as_secs_f64());
    counter!("http_requests_total", "method" => method, "route" => route, "status" => status)
        .increment(1);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_user_created(role: &str) {
    counter!("users_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_user_login_success(role: &str) {
    counter!("logins_total", "outcome" => "success", "role" => role.to_string()).increment(1);
}

pub fn track_user_login_failure() {
    counter!("logins_total", "outcome" => "failure", "role" => "unknown").increment(1);
}

pub fn track_jwt_issued() {
    counter!("tokens_issued_total").increment(1);
}

/// `outcome` is one of `success`, `missing_token`, `invalid_token`, `unknown_user`.
pub fn track_authentication(outcome: &'static str) {
    counter!("authentication_total", "outcome" => outcome).increment(1);
}

/// Role-gate decisions per operation.
pub fn track_authorization_check(allowed: bool, role: &str, operation: &'static str) {
    let decision = if allowed { "allowed" } else { "denied" };
    counter!(
        "authorization_decisions_total",
        "decision" => decision,
        "role" => role.to_string(),
        "operation" => operation
    )
    .increment(1);
}
