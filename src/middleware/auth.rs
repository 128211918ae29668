//! Identity resolution.
//!
//! [`authenticate`] runs as a route layer in front of every protected router.
//! It turns the bearer token into the caller's [`UserRecord`] (loaded fresh
//! from the store, without the password hash) and stores it in the request
//! extensions as [`CurrentUser`]. Any failure ends the request with 401.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use schoolhouse_core::AppError;
use schoolhouse_models::{Role, UserRecord};
use uuid::Uuid;

use crate::metrics;
use crate::state::AppState;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const USER_NOT_FOUND: &str = "User not found";

/// The authenticated caller. Never carries a password hash.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role()
    }

    pub fn record(&self) -> &UserRecord {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Only reachable without an identity if a router forgot the layer.
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(NO_TOKEN))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the token in `headers` to a stored identity.
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<UserRecord, AppError> {
    let token = bearer_token(headers).ok_or_else(|| {
        metrics::track_authentication("missing_token");
        AppError::unauthorized(NO_TOKEN)
    })?;

    let user_id = state.tokens.verify(token).inspect_err(|_| {
        metrics::track_authentication("invalid_token");
    })?;

    let user = state
        .store
        .get::<UserRecord>(user_id)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| {
            metrics::track_authentication("unknown_user");
            AppError::unauthorized(USER_NOT_FOUND)
        })?;

    metrics::track_authentication("success");
    Ok(user.without_secret())
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_identity(&state, req.headers()).await?;

    tracing::debug!(user_id = %user.id, role = %user.role(), "Authenticated");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
