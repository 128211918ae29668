use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_grade, get_class_grades, get_student_grades};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_grade))
        .route("/class/{class_id}", get(get_class_grades))
        .route("/student/{student_id}", get(get_student_grades))
}
