use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use learnhub_core::AppError;
use learnhub_models::{CreateAssignmentRequest, Row};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/classes/{id}/assignments",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Assignments of the class", body = Vec<Row>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows =
        AssignmentService::list_for_class(state.store.as_ref(), auth_user.caller(), class_id)
            .await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

/// Add an assignment to a class (class owner or admin)
#[utoipa::path(
    post,
    path = "/api/classes/{id}/assignments",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or the class owner"),
        (status = 404, description = "Class not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(class_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Row>), AppError> {
    let assignment = AssignmentService::create_assignment(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        class_id,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Row(assignment))))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or the author"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AssignmentService::delete_assignment(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
