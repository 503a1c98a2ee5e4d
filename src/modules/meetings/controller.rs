use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use learnhub_core::AppError;
use learnhub_models::{CreateMeetingRequest, Row};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::meetings::service::MeetingService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/meetings",
    responses(
        (status = 200, description = "Meetings by start time", body = Vec<Row>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Meetings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_meetings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows = MeetingService::list_meetings(state.store.as_ref(), auth_user.caller()).await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

/// Schedule a meeting hosted by the caller
#[utoipa::path(
    post,
    path = "/api/meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 422, description = "Validation error")
    ),
    tag = "Meetings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_meeting(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<Row>), AppError> {
    let meeting = MeetingService::create_meeting(
        state.store.as_ref(),
        auth_user.caller(),
        auth_user.id(),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Row(meeting))))
}

#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    params(
        ("id" = Uuid, Path, description = "Meeting ID")
    ),
    responses(
        (status = 204, description = "Meeting deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or the host"),
        (status = 404, description = "Meeting not found")
    ),
    tag = "Meetings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_meeting(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MeetingService::delete_meeting(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
