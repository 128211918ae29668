use anyhow::anyhow;
use chrono::Utc;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{CreateEventDto, Event, UserRecord};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::ownership::ensure_event_owner;

pub struct EventService;

impl EventService {
    /// All events, soonest first.
    #[instrument(skip(store))]
    pub async fn list(store: &Store) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = store.find(&Filter::new()).await?;
        events.sort_by_key(|event| event.starts_at);
        Ok(events)
    }

    #[instrument(skip(store, user, dto), fields(user_id = %user.id))]
    pub async fn create(
        store: &Store,
        user: &UserRecord,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        let event = Event {
            id: Uuid::new_v4(),
            title: dto.title,
            description: dto.description,
            starts_at: dto.starts_at,
            location: dto.location,
            created_by: user.id,
            created_at: Utc::now(),
        };
        store.insert(&event).await?;

        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn delete(store: &Store, user: &UserRecord, id: Uuid) -> Result<(), AppError> {
        let event = store
            .get::<Event>(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))?;
        ensure_event_owner(user, &event)?;

        store.delete::<Event>(id).await?;
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
