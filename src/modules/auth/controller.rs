use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{instrument, warn};
use utoipa::{IntoParams, ToSchema};

use learnhub_auth::Identity;
use learnhub_core::AppError;
use learnhub_models::{SessionResponse, SignInRequest, SignUpRequest};

use crate::middleware::auth::{
    AuthUser, cleared_cookie_jar, cleared_verifier_cookie, credentials_from_headers,
    redirect_to, session_cookie_jar,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::{AuthService, safe_next};

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Sign in with email and password
///
/// Sets the access and refresh session cookies.
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let session = AuthService::sign_in(state.provider.as_ref(), dto).await?;

    let user = Identity::from(&session.user);
    let jar = session_cookie_jar(&state.session_config, &session);

    Ok((jar, Json(SessionResponse { user })))
}

/// Register a new account
///
/// `role` may be `STUDENT` (default) or `TEACHER`. Cookies are only set when
/// the provider returns a session right away.
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Malformed request or email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error, including a requested ADMIN role", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), AppError> {
    let sign_up = AuthService::sign_up(state.provider.as_ref(), state.store.as_ref(), dto).await?;

    let jar = match &sign_up.session {
        Some(session) => session_cookie_jar(&state.session_config, session),
        None => CookieJar::new(),
    };
    let user = Identity::from(&sign_up.user);

    Ok((StatusCode::CREATED, jar, Json(SessionResponse { user })))
}

/// Sign out
///
/// Always clears the session cookies; provider failures are only logged.
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 204, description = "Signed out")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, headers))]
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let credentials = credentials_from_headers(&headers, &state.session_config);
    AuthService::sign_out(state.provider.as_ref(), credentials.access_token.as_deref()).await;

    (StatusCode::NO_CONTENT, cleared_cookie_jar(&state.session_config))
}

/// Current session's identity
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Signed-in identity", body = SessionResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument]
pub async fn get_session(auth_user: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: auth_user.identity,
    })
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// Authorization code issued by the provider
    pub code: Option<String>,
    /// Same-site path to continue to (default `/dashboard`)
    pub next: Option<String>,
    /// Set by the provider when the flow failed
    pub error: Option<String>,
}

/// OAuth / magic-link callback
///
/// Exchanges the code for a session, sets cookies and redirects to `next`.
#[utoipa::path(
    get,
    path = "/auth/callback",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to `next`, or to the login page on failure")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, params), fields(has_code = params.code.is_some()))]
pub async fn auth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let config = &state.session_config;
    let failure = format!("{}?error=auth_callback_failed", config.login_path);

    if let Some(error) = &params.error {
        warn!(error = %error, "provider reported a failed auth flow");
        return redirect_to(&failure);
    }
    let Some(code) = params.code.as_deref().filter(|code| !code.is_empty()) else {
        return redirect_to(&failure);
    };

    let verifier = jar
        .get(&config.code_verifier_cookie)
        .map(|cookie| cookie.value().to_string());

    match AuthService::exchange_code(state.provider.as_ref(), code, verifier.as_deref()).await {
        Ok(session) => {
            let destination = safe_next(params.next.as_deref(), &config.default_redirect);
            let jar = session_cookie_jar(config, &session).add(cleared_verifier_cookie(config));
            (jar, redirect_to(&destination)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "auth code exchange failed");
            redirect_to(&failure)
        }
    }
}
