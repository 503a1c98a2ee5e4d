use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{grade_submission, list_submissions, my_submissions, submit};

/// Nested under `/assignments/{id}/submissions`.
pub fn init_assignment_submissions_router() -> Router<AppState> {
    Router::new().route("/", get(list_submissions).post(submit))
}

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(my_submissions))
        .route("/{id}/grade", patch(grade_submission))
}
