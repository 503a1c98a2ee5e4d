use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use learnhub_core::AppError;
use learnhub_models::{Profile, Row, UpdateRoleRequest, UserFilterParams};

use crate::metrics::track_role_change;
use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the caller's cached profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile row", body = Row),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile row for this user")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Row>, AppError> {
    let profile =
        UserService::get_profile(state.store.as_ref(), auth_user.caller(), auth_user.id()).await?;
    Ok(Json(Row(profile)))
}

/// List profiles (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Profile rows", body = Vec<Row>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows =
        UserService::list_profiles(state.store.as_ref(), auth_user.caller(), filters).await?;
    Ok(Json(rows.into_iter().map(Row).collect()))
}

/// Change a user's role (admin only)
///
/// Updates the role in the provider's user metadata, then rewrites the
/// profile cache row.
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 503, description = "Service role key not configured")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_user_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = UserService::change_role(
        state.provider.as_ref(),
        state.store.as_ref(),
        id,
        dto.role,
    )
    .await?;

    track_role_change(profile.role.as_str());
    Ok(Json(profile))
}
