use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_class_attendance, get_student_attendance, mark_attendance};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(mark_attendance))
        .route("/class/{class_id}", get(get_class_attendance))
        .route("/student/{student_id}", get(get_student_attendance))
}
