use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{create_event, delete_event, get_events};

pub fn init_events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_events).post(create_event))
        .route("/{id}", delete(delete_event))
}
