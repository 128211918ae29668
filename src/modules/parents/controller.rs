use axum::{Json, extract::State};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{StudentAttendanceResponse, StudentGradesResponse, User};
use tracing::instrument;

use crate::middleware::role::{RequireChildAttendance, RequireChildGrades, RequireChildProfile};
use crate::state::AppState;

use super::service::ParentService;

#[utoipa::path(
    get,
    path = "/api/parents/child",
    responses(
        (status = 200, description = "The parent's child", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - parents only", body = MessageResponse),
        (status = 404, description = "Child not found", body = MessageResponse)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, parent))]
pub async fn get_child(
    State(state): State<AppState>,
    RequireChildProfile(parent): RequireChildProfile,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let child = ParentService::child(&state.store, parent.record()).await?;
    Ok(Json(ApiResponse::ok(child)))
}

#[utoipa::path(
    get,
    path = "/api/parents/child/grades",
    responses(
        (status = 200, description = "The child's grades with per-subject averages", body = ApiResponse<StudentGradesResponse>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - parents only", body = MessageResponse),
        (status = 404, description = "Child not found", body = MessageResponse)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, parent))]
pub async fn get_child_grades(
    State(state): State<AppState>,
    RequireChildGrades(parent): RequireChildGrades,
) -> Result<Json<ApiResponse<StudentGradesResponse>>, AppError> {
    let report = ParentService::child_grades(&state.store, parent.record()).await?;
    Ok(Json(ApiResponse::ok(report)))
}

#[utoipa::path(
    get,
    path = "/api/parents/child/attendance",
    responses(
        (status = 200, description = "The child's attendance with counts", body = ApiResponse<StudentAttendanceResponse>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - parents only", body = MessageResponse),
        (status = 404, description = "Child not found", body = MessageResponse)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, parent))]
pub async fn get_child_attendance(
    State(state): State<AppState>,
    RequireChildAttendance(parent): RequireChildAttendance,
) -> Result<Json<ApiResponse<StudentAttendanceResponse>>, AppError> {
    let report = ParentService::child_attendance(&state.store, parent.record()).await?;
    Ok(Json(ApiResponse::ok(report)))
}
