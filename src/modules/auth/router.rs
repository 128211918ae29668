use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{get_me, login_user, register_user, update_profile};

/// Routes reachable without a token.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

/// Routes for the authenticated caller's own account.
pub fn init_account_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/profile", put(update_profile))
}
