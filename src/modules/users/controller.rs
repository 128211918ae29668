use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserRequest};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{
    RequireCreateUser, RequireDeleteUser, RequireGetUser, RequireListUsers, RequireUpdateUser,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Paginated list of users", body = ApiResponse<PaginatedUsersResponse>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireListUsers(_user): RequireListUsers,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<ApiResponse<PaginatedUsersResponse>>, AppError> {
    let users = UserService::list_users(&state.store, filters).await?;
    Ok(Json(ApiResponse::ok(users)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Missing role attributes or email already exists", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin_id = %admin.0.id()))]
pub async fn create_user(
    State(state): State<AppState>,
    admin: RequireCreateUser,
    ValidatedJson(dto): ValidatedJson<UserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = UserService::create_user(&state.store, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User created", user.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireGetUser(_user): RequireGetUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = UserService::get_user(&state.store, id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, description = "Missing role attributes or email already exists", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireUpdateUser(_user): RequireUpdateUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = UserService::update_user(&state.store, id, dto).await?;
    Ok(Json(ApiResponse::with_message("User updated", user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete own account", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireDeleteUser(admin): RequireDeleteUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    UserService::delete_user(&state.store, admin.id(), id).await?;
    Ok(Json(ApiResponse::message("User deleted")))
}
