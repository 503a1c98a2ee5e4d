use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{get_me, list_users, update_user_role};

/// Routes open to every signed-in user.
pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Role management; mounted behind `require_admin`.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}/role", patch(update_user_role))
}
