use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use learnhub_core::AppError;
use learnhub_models::{CreateClassRequest, Row, UpdateClassRequest};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Classes, newest first", body = Vec<Row>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows = ClassService::list_classes(state.store.as_ref(), auth_user.caller()).await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

/// Create a class owned by the caller
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN or TEACHER"),
        (status = 422, description = "Validation error")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateClassRequest>,
) -> Result<(StatusCode, Json<Row>), AppError> {
    let class = ClassService::create_class(
        state.store.as_ref(),
        auth_user.caller(),
        auth_user.id(),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Row(class))))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Row>, AppError> {
    let class = ClassService::get_class(state.store.as_ref(), auth_user.caller(), id).await?;
    Ok(Json(Row(class)))
}

/// Update a class (owner or admin)
#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Updated class", body = Row),
        (status = 400, description = "No fields to update"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the class owner"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassRequest>,
) -> Result<Json<Row>, AppError> {
    let class = ClassService::update_class(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        id,
        dto,
    )
    .await?;

    Ok(Json(Row(class)))
}

/// Delete a class (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the class owner"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ClassService::delete_class(
        state.store.as_ref(),
        auth_user.caller(),
        &auth_user.identity,
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
