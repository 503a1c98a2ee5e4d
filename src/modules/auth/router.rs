use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{auth_callback, get_session, sign_in, sign_out, sign_up};

/// Public `/api/auth` routes; no session is required.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-up", post(sign_up))
        .route("/sign-out", post(sign_out))
}

/// `/api/auth/session`, mounted with the gated API routes.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/auth/session", get(get_session))
}

/// Browser callback for OAuth and magic-link flows.
pub fn init_callback_router() -> Router<AppState> {
    Router::new().route("/auth/callback", get(auth_callback))
}
