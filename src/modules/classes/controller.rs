use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{AddStudentDto, Class, CreateClassDto, UpdateScheduleDto};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{
    RequireAddStudent, RequireCreateClass, RequireDeleteClass, RequireGetClass,
    RequireListClasses, RequireRemoveStudent, RequireUpdateSchedule,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ClassService;

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Classes visible to the caller", body = ApiResponse<Vec<Class>>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_classes(
    State(state): State<AppState>,
    RequireListClasses(user): RequireListClasses,
) -> Result<Json<ApiResponse<Vec<Class>>>, AppError> {
    let classes = ClassService::list_classes(&state.store, user.record()).await?;
    Ok(Json(ApiResponse::ok(classes)))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<Class>),
        (status = 400, description = "Invalid teacher or student reference, or over capacity", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireCreateClass(_user): RequireCreateClass,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ApiResponse<Class>>), AppError> {
    let class = ClassService::create_class(&state.store, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Class created", class)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ApiResponse<Class>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the owning teacher or an enrolled student", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_class(
    State(state): State<AppState>,
    RequireGetClass(user): RequireGetClass,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::get_class(&state.store, user.record(), id).await?;
    Ok(Json(ApiResponse::ok(class)))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/schedule",
    params(("id" = Uuid, Path, description = "Class ID")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule replaced", body = ApiResponse<Class>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn update_schedule(
    State(state): State<AppState>,
    RequireUpdateSchedule(user): RequireUpdateSchedule,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::update_schedule(&state.store, user.record(), id, dto).await?;
    Ok(Json(ApiResponse::with_message("Schedule updated", class)))
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/students",
    params(("id" = Uuid, Path, description = "Class ID")),
    request_body = AddStudentDto,
    responses(
        (status = 200, description = "Student enrolled (or already enrolled)", body = ApiResponse<Class>),
        (status = 400, description = "Not a student, or the class is full", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn add_student(
    State(state): State<AppState>,
    RequireAddStudent(user): RequireAddStudent,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AddStudentDto>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::add_student(&state.store, user.record(), id, dto.student_id).await?;
    Ok(Json(ApiResponse::with_message("Student added to class", class)))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}/students/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Class ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student removed", body = ApiResponse<Class>),
        (status = 400, description = "Student does not belong to this class", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn remove_student(
    State(state): State<AppState>,
    RequireRemoveStudent(user): RequireRemoveStudent,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::remove_student(&state.store, user.record(), id, student_id).await?;
    Ok(Json(ApiResponse::with_message("Student removed from class", class)))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the owning teacher", body = MessageResponse),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireDeleteClass(user): RequireDeleteClass,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    ClassService::delete_class(&state.store, user.record(), id).await?;
    Ok(Json(ApiResponse::message("Class deleted")))
}
