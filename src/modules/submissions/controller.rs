use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use learnhub_core::AppError;
use learnhub_models::{GradeRequest, Row, SubmitRequest};

use crate::middleware::role::{RequireStaff, RequireStudent};
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Submit work for an assignment (students only, once per assignment)
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submissions",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Submission created", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires STUDENT"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Already submitted")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn submit(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(assignment_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SubmitRequest>,
) -> Result<(StatusCode, Json<Row>), AppError> {
    let submission = SubmissionService::submit(
        state.store.as_ref(),
        auth_user.caller(),
        auth_user.id(),
        assignment_id,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Row(submission))))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}/submissions",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Submissions for the assignment", body = Vec<Row>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_submissions(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows = SubmissionService::list_for_assignment(
        state.store.as_ref(),
        auth_user.caller(),
        assignment_id,
    )
    .await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

#[utoipa::path(
    get,
    path = "/api/submissions/mine",
    responses(
        (status = 200, description = "The caller's submissions", body = Vec<Row>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires STUDENT")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn my_submissions(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows =
        SubmissionService::list_for_student(state.store.as_ref(), auth_user.caller(), auth_user.id())
            .await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

/// Grade a submission (0 to 100)
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}/grade",
    params(
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Graded submission", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 404, description = "Submission not found"),
        (status = 422, description = "Grade out of range")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<GradeRequest>,
) -> Result<Json<Row>, AppError> {
    let graded = SubmissionService::grade(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        id,
        dto,
    )
    .await?;

    Ok(Json(Row(graded)))
}
