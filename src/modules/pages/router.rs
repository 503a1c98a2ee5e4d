use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    admin_page, admin_users_page, dashboard_page, home_page, login_page, profile_page,
    register_page, teacher_page,
};

pub fn init_public_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
}

/// Pages that run their own gate; mounted behind `session_middleware`.
pub fn init_protected_pages_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_page))
        .route("/admin", get(admin_page))
        .route("/admin/users", get(admin_users_page))
        .route("/teacher", get(teacher_page))
        .route("/profile", get(profile_page))
}
