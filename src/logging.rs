use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const DEFAULT_LOG_DIR: &str = "storage/logs";

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Reuses the caller's `x-request-id` when it is a UUID, otherwise mints one.
fn request_id(req: &Request) -> Uuid {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4)
}

fn log_outcome(status: StatusCode, latency: Duration) {
    let status_code = status.as_u16();
    let latency_ms = latency.as_millis() as u64;

    if status.is_server_error() {
        error!(status = status_code, latency_ms, "Server error");
    } else if status.is_client_error() {
        warn!(status = status_code, latency_ms, "Client error");
    } else {
        info!(status = status_code, latency_ms, "Request completed");
    }
}

/// Wraps each request in a span carrying its id, method and route template,
/// and echoes the id back in `x-request-id`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id(&req);
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
    );

    let mut response = async move {
        info!("Incoming request");
        let response = next.run(req).await;
        log_outcome(response.status(), start.elapsed());
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| match std::env::var("LOG_LEVEL") {
            Ok(level) => EnvFilter::try_new(level),
            Err(_) => EnvFilter::try_new(format!(
                "{}=info,schoolhouse_db=info,tower_http=warn,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            )),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Console output plus daily-rolling JSON files under `LOG_DIR`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_tracing() -> Option<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(default_filter());

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        warn!(error = %e, log_dir = %log_dir, "Log directory unavailable, logging to console only");
        return None;
    }

    let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "schoolhouse.json");
    let (json_writer, guard) = tracing_appender::non_blocking(json_appender);

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    info!(log_dir = %log_dir, "Tracing initialized");
    Some(guard)
}
