use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::{init_account_router, init_auth_router};
use crate::modules::classes::init_classes_router;
use crate::modules::conversations::init_conversations_router;
use crate::modules::events::init_events_router;
use crate::modules::grades::init_grades_router;
use crate::modules::parents::init_parents_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/auth",
                    init_auth_router().merge(protected(init_account_router(), &state)),
                )
                .nest("/users", protected(init_users_router(), &state))
                .nest("/classes", protected(init_classes_router(), &state))
                .nest("/grades", protected(init_grades_router(), &state))
                .nest("/attendance", protected(init_attendance_router(), &state))
                .nest(
                    "/conversations",
                    protected(init_conversations_router(), &state),
                )
                .nest("/events", protected(init_events_router(), &state))
                .nest("/parents", protected(init_parents_router(), &state)),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Puts `router` behind identity resolution.
fn protected(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([REQUEST_ID_HEADER.clone()])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhouse_auth::TokenService;
    use schoolhouse_config::{CorsConfig, JwtConfig};
    use schoolhouse_db::Store;

    #[test]
    fn test_wildcard_origin_builds_router() {
        let tokens = TokenService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            token_expiry: 3600,
        })
        .unwrap();
        let cors = CorsConfig::from_lookup(|_| Some("*,http://app.test".into()));
        let state = AppState::new(Store::memory(), tokens, cors);

        let _router = init_router(state);
    }
}
