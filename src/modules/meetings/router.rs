use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{create_meeting, delete_meeting, list_meetings};

pub fn init_meetings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meetings).post(create_meeting))
        .route("/{id}", delete(delete_meeting))
}
