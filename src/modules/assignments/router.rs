use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{create_assignment, delete_assignment, list_assignments};

/// Nested under `/classes/{id}/assignments`.
pub fn init_class_assignments_router() -> Router<AppState> {
    Router::new().route("/", get(list_assignments).post(create_assignment))
}

pub fn init_assignments_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_assignment))
}
