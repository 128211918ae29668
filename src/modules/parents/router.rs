use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_child, get_child_attendance, get_child_grades};

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route("/child", get(get_child))
        .route("/child/grades", get(get_child_grades))
        .route("/child/attendance", get(get_child_attendance))
}
