use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhouse_core::{ApiResponse, AppError, MessageResponse};
use schoolhouse_models::{Conversation, CreateConversationDto, Message, SendMessageDto};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{
    RequireCreateConversation, RequireListConversations, RequireListMessages, RequireSendMessage,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ConversationService;

#[utoipa::path(
    post,
    path = "/api/conversations",
    request_body = CreateConversationDto,
    responses(
        (status = 201, description = "Conversation created", body = ApiResponse<Conversation>),
        (status = 200, description = "A conversation with these participants already exists", body = ApiResponse<Conversation>),
        (status = 400, description = "Unknown participant", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Messaging",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn create_conversation(
    State(state): State<AppState>,
    RequireCreateConversation(user): RequireCreateConversation,
    ValidatedJson(dto): ValidatedJson<CreateConversationDto>,
) -> Result<(StatusCode, Json<ApiResponse<Conversation>>), AppError> {
    let (conversation, created) =
        ConversationService::create(&state.store, user.record(), dto).await?;

    if created {
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Conversation created", conversation)),
        ))
    } else {
        Ok((StatusCode::OK, Json(ApiResponse::ok(conversation))))
    }
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    responses(
        (status = 200, description = "Conversations the caller takes part in", body = ApiResponse<Vec<Conversation>>),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    ),
    tag = "Messaging",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_conversations(
    State(state): State<AppState>,
    RequireListConversations(user): RequireListConversations,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let conversations = ConversationService::list(&state.store, user.record()).await?;
    Ok(Json(ApiResponse::ok(conversations)))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<Vec<Message>>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not a participant", body = MessageResponse),
        (status = 404, description = "Conversation not found", body = MessageResponse)
    ),
    tag = "Messaging",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_messages(
    State(state): State<AppState>,
    RequireListMessages(user): RequireListMessages,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let messages = ConversationService::messages(&state.store, user.record(), id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<Message>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Not authorized to message in this conversation", body = MessageResponse),
        (status = 404, description = "Conversation not found", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Messaging",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    RequireSendMessage(user): RequireSendMessage,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SendMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), AppError> {
    let message = ConversationService::send_message(&state.store, user.record(), id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Message sent", message)),
    ))
}
