use anyhow::anyhow;
use chrono::Utc;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{
    Conversation, CreateConversationDto, Message, SendMessageDto, UserRecord,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::ownership::ensure_participant;

pub struct ConversationService;

impl ConversationService {
    /// Opens a conversation between the caller and `participant_ids`.
    ///
    /// Returns the existing conversation when one with exactly the same
    /// participants already exists; the flag is `true` when a new one was
    /// created.
    #[instrument(skip(store, user, dto), fields(user_id = %user.id))]
    pub async fn create(
        store: &Store,
        user: &UserRecord,
        dto: CreateConversationDto,
    ) -> Result<(Conversation, bool), AppError> {
        let participants = Conversation::normalize(
            dto.participant_ids.into_iter().chain([user.id]),
        );
        if participants.len() < 2 {
            return Err(AppError::bad_request(anyhow!(
                "A conversation needs at least one other participant"
            )));
        }

        for &participant in participants.iter().filter(|id| **id != user.id) {
            if store.get::<UserRecord>(participant).await?.is_none() {
                return Err(AppError::bad_request(anyhow!(
                    "Participant {} not found",
                    participant
                )));
            }
        }

        if let Some(existing) = Self::list(store, user)
            .await?
            .into_iter()
            .find(|conversation| conversation.participants == participants)
        {
            return Ok((existing, false));
        }

        let conversation = Conversation::new(user.id, participants);
        store.insert(&conversation).await?;

        tracing::info!(conversation_id = %conversation.id, "Conversation created");
        Ok((conversation, true))
    }

    /// Conversations the caller takes part in.
    pub async fn list(store: &Store, user: &UserRecord) -> Result<Vec<Conversation>, AppError> {
        Ok(store
            .find(&Filter::new().contains("participants", user.id))
            .await?)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn messages(
        store: &Store,
        user: &UserRecord,
        id: Uuid,
    ) -> Result<Vec<Message>, AppError> {
        let conversation = Self::load(store, id).await?;
        ensure_participant(user, &conversation)?;

        Ok(store.find(&Filter::new().eq("conversationId", id)).await?)
    }

    /// Posts a message. Only participants may post; a rejected post leaves
    /// the conversation untouched.
    #[instrument(skip(store, user, dto), fields(user_id = %user.id))]
    pub async fn send_message(
        store: &Store,
        user: &UserRecord,
        id: Uuid,
        dto: SendMessageDto,
    ) -> Result<Message, AppError> {
        let conversation = Self::load(store, id).await?;
        ensure_participant(user, &conversation)?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            sender_id: user.id,
            content: dto.content,
            created_at: Utc::now(),
        };
        store.insert(&message).await?;

        Ok(message)
    }

    async fn load(store: &Store, id: Uuid) -> Result<Conversation, AppError> {
        store
            .get::<Conversation>(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Conversation not found")))
    }
}
