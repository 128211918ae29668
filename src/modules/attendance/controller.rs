use axum::{
    Json,
    extract::{Path, Query, State},
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{AttendanceRecord, MarkAttendanceDto, StudentAttendanceResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{
    RequireClassAttendance, RequireMarkAttendance, RequireStudentAttendance,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::AttendanceQuery;
use super::service::AttendanceService;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendanceDto,
    responses(
        (status = 200, description = "Attendance recorded; repeated marks overwrite", body = ApiResponse<Vec<AttendanceRecord>>),
        (status = 400, description = "Student does not belong to this class", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not an admin or the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    RequireMarkAttendance(user): RequireMarkAttendance,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, AppError> {
    let records = AttendanceService::mark(&state.store, user.record(), dto).await?;
    Ok(Json(ApiResponse::with_message("Attendance recorded", records)))
}

#[utoipa::path(
    get,
    path = "/api/attendance/class/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Attendance for the class", body = ApiResponse<Vec<AttendanceRecord>>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not an admin or the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_class_attendance(
    State(state): State<AppState>,
    RequireClassAttendance(user): RequireClassAttendance,
    Path(class_id): Path<Uuid>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, AppError> {
    let records =
        AttendanceService::class_attendance(&state.store, user.record(), class_id, query).await?;
    Ok(Json(ApiResponse::ok(records)))
}

#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance with present/absent/late counts", body = ApiResponse<StudentAttendanceResponse>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the student or the student's parent", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    RequireStudentAttendance(user): RequireStudentAttendance,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ApiResponse<StudentAttendanceResponse>>, AppError> {
    let report =
        AttendanceService::student_attendance(&state.store, user.record(), student_id).await?;
    Ok(Json(ApiResponse::ok(report)))
}
