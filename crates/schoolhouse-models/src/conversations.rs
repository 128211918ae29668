//! Conversations and messages.
//!
//! Messages are stored as their own documents rather than inside the
//! conversation, so two participants posting at once never overwrite each
//! other.

use chrono::{DateTime, Utc};
use schoolhouse_db::{Collection, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    /// Sorted and free of duplicates.
    pub participants: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(created_by: Uuid, participants: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            participants: Self::normalize(participants.into_iter().chain([created_by])),
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn normalize(participants: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
        let mut participants: Vec<Uuid> = participants.into_iter().collect();
        participants.sort();
        participants.dedup();
        participants
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }
}

impl Document for Conversation {
    const COLLECTION: Collection = Collection::Conversations;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Message {
    const COLLECTION: Collection = Collection::Messages;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationDto {
    /// Other participants; the caller is always added.
    #[validate(length(min = 1, max = 50))]
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}
