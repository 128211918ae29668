use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_conversation, get_conversations, get_messages, send_message};

pub fn init_conversations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_conversations).post(create_conversation))
        .route("/{id}/messages", get(get_messages).post(send_message))
}
