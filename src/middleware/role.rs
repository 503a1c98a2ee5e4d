//! Role-based authorization for Axum
//!
//! Three ways to guard a route against the caller's [`Role`]:
//! 1. Route-layer middleware (`require_admin`, `require_staff`)
//! 2. Extractors generated by [`require_role!`](crate::require_role) for API
//!    handlers and [`require_page_role!`](crate::require_page_role) for pages
//! 3. [`check_any_role`] for checks inside handler logic
//!
//! A denial is final: the request never reaches the handler. API routes
//! answer 403, pages redirect to the default landing page.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use learnhub_auth::{Identity, Role};
use learnhub_core::AppError;

use crate::metrics::track_role_denial;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const STAFF: &[Role] = &[Role::Admin, Role::Teacher];
pub const STUDENT_ONLY: &[Role] = &[Role::Student];

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Allows the identity if its role is in `allowed_roles`.
///
/// An empty allow-list denies everyone.
pub fn check_any_role(identity: &Identity, allowed_roles: &[Role]) -> Result<(), AppError> {
    if identity.has_any_role(allowed_roles) {
        return Ok(());
    }

    track_role_denial(identity.role.as_str());
    tracing::debug!(user_id = %identity.id, role = %identity.role, "role denied");

    Err(AppError::forbidden(format!(
        "Access denied. Required roles: [{}], but user has role: {}",
        role_list(allowed_roles),
        identity.role
    )))
}

/// Middleware that authenticates the caller and checks their role before
/// running the rest of the stack.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/reports", get(reports))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, STAFF),
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user.identity, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routes.
///
/// ```rust,ignore
/// Router::new()
///     .route("/", get(list_users))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, ADMIN_ONLY).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Routes open to teachers and admins.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, STAFF).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Generates an API extractor that authenticates the caller and requires one
/// of the given roles (401 without a session, 403 on a role mismatch).
#[macro_export]
macro_rules! require_role {
    ($name:ident, $roles:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = learnhub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;
                $crate::middleware::role::check_any_role(&auth_user.identity, $roles)?;
                Ok($name(auth_user))
            }
        }
    };
}

/// Page variant of [`require_role!`]: anonymous visitors go to the login
/// page, the wrong role goes to the default landing page.
#[macro_export]
macro_rules! require_page_role {
    ($name:ident, $roles:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = axum::response::Response;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::PageUser(auth_user) =
                    <$crate::middleware::auth::PageUser as axum::extract::FromRequestParts<
                        $crate::state::AppState,
                    >>::from_request_parts(parts, state)
                    .await?;

                if $crate::middleware::role::check_any_role(&auth_user.identity, $roles).is_err() {
                    return Err($crate::middleware::auth::redirect_to(
                        &state.session_config.default_redirect,
                    ));
                }
                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireAdmin, ADMIN_ONLY);
require_role!(RequireStaff, STAFF);
require_role!(RequireStudent, STUDENT_ONLY);

require_page_role!(AdminPage, ADMIN_ONLY);
require_page_role!(TeacherPage, STAFF);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "user@learnhub.test".to_string(),
            name: "User".to_string(),
            role,
            avatar: None,
        }
    }

    #[test]
    fn test_allowed_roles_pass() {
        assert!(check_any_role(&identity(Role::Admin), ADMIN_ONLY).is_ok());
        assert!(check_any_role(&identity(Role::Teacher), STAFF).is_ok());
        assert!(check_any_role(&identity(Role::Admin), STAFF).is_ok());
        assert!(check_any_role(&identity(Role::Student), STUDENT_ONLY).is_ok());
    }

    #[test]
    fn test_mismatch_is_forbidden() {
        for (role, allowed) in [
            (Role::Student, ADMIN_ONLY),
            (Role::Teacher, ADMIN_ONLY),
            (Role::Student, STAFF),
            (Role::Teacher, STUDENT_ONLY),
            (Role::Admin, STUDENT_ONLY),
        ] {
            let err = check_any_role(&identity(role), allowed).unwrap_err();
            assert_eq!(err.status, StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn test_empty_allow_list_denies_everyone() {
        for role in Role::ALL {
            assert!(check_any_role(&identity(role), &[]).is_err());
        }
    }

    #[test]
    fn test_denial_message_names_roles() {
        let err = check_any_role(&identity(Role::Student), STAFF).unwrap_err();
        assert_eq!(
            err.error.to_string(),
            "Access denied. Required roles: [ADMIN, TEACHER], but user has role: STUDENT"
        );
    }
}
