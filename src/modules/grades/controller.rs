use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{CreateGradeDto, GradeRecord, StudentGradesResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireClassGrades, RequireCreateGrade, RequireStudentGrades};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::GradeService;

#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = ApiResponse<GradeRecord>),
        (status = 400, description = "Student does not belong to this class", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not an admin or the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn create_grade(
    State(state): State<AppState>,
    RequireCreateGrade(user): RequireCreateGrade,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<ApiResponse<GradeRecord>>), AppError> {
    let grade = GradeService::create_grade(&state.store, user.record(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Grade recorded", grade)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/grades/class/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Grades recorded in the class", body = ApiResponse<Vec<GradeRecord>>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not an admin or the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_class_grades(
    State(state): State<AppState>,
    RequireClassGrades(user): RequireClassGrades,
    Path(class_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<GradeRecord>>>, AppError> {
    let grades = GradeService::class_grades(&state.store, user.record(), class_id).await?;
    Ok(Json(ApiResponse::ok(grades)))
}

#[utoipa::path(
    get,
    path = "/api/grades/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Grades with per-subject averages", body = ApiResponse<StudentGradesResponse>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the student or the student's parent", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_student_grades(
    State(state): State<AppState>,
    RequireStudentGrades(user): RequireStudentGrades,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ApiResponse<StudentGradesResponse>>, AppError> {
    let report = GradeService::student_grades(&state.store, user.record(), student_id).await?;
    Ok(Json(ApiResponse::ok(report)))
}
