use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{CreateEventDto, Event};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireCreateEvent, RequireDeleteEvent, RequireListEvents};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::EventService;

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Upcoming and past events", body = ApiResponse<Vec<Event>>),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _user))]
pub async fn get_events(
    State(state): State<AppState>,
    RequireListEvents(_user): RequireListEvents,
) -> Result<Json<ApiResponse<Vec<Event>>>, AppError> {
    let events = EventService::list(&state.store).await?;
    Ok(Json(ApiResponse::ok(events)))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<Event>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireCreateEvent(user): RequireCreateEvent,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), AppError> {
    let event = EventService::create(&state.store, user.record(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Event created", event)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not the creator", body = MessageResponse),
        (status = 404, description = "Event not found", body = MessageResponse)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_event(
    State(state): State<AppState>,
    RequireDeleteEvent(user): RequireDeleteEvent,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    EventService::delete(&state.store, user.record(), id).await?;
    Ok(Json(ApiResponse::message("Event deleted")))
}
