use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

use super::controller::{
    add_student, create_class, delete_class, get_class, get_classes, remove_student,
    update_schedule,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_classes).post(create_class))
        .route("/{id}", get(get_class).delete(delete_class))
        .route("/{id}/schedule", put(update_schedule))
        .route("/{id}/students", post(add_student))
        .route("/{id}/students/{student_id}", delete(remove_student))
}
