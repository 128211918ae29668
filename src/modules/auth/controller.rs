use axum::{Json, extract::State, http::StatusCode};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{AuthResponse, LoginRequest, UpdateProfileDto, User, UserRequest};
use tracing::instrument;

use crate::middleware::role::{RequireGetMe, RequireUpdateProfile};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

/// Register a teacher, student or parent account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Registered; returns a token and the new user", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Missing role attributes or email already exists", body = MessageResponse),
        (status = 403, description = "Administrator accounts cannot be self-registered", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let response = AuthService::register(&state.store, &state.tokens, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration successful", response)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let response = AuthService::login(&state.store, &state.tokens, dto).await?;
    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

/// The authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(user), fields(user_id = %user.id()))]
pub async fn get_me(RequireGetMe(user): RequireGetMe) -> Json<ApiResponse<User>> {
    Json(ApiResponse::ok(user.record().to_user()))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 400, description = "Field not applicable to the caller's role", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto), fields(user_id = %user.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUpdateProfile(user): RequireUpdateProfile,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let updated = AuthService::update_profile(&state.store, user.record(), dto).await?;
    Ok(Json(ApiResponse::with_message("Profile updated", updated.into())))
}
