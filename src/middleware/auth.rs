//! Auth gate: session lookup, extractors and session cookies.
//!
//! Credentials come from `Authorization: Bearer <access token>` (API clients)
//! or from the session cookie pair set at sign-in. Lookups go through the
//! shared [`SessionResolver`](learnhub_auth::SessionResolver); a request is
//! resolved at most once and the result is cached in request extensions as
//! [`ResolvedSession`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};
use url::form_urlencoded;
use uuid::Uuid;

use learnhub_auth::{AuthSession, Credentials, Identity, Role};
use learnhub_config::SessionConfig;
use learnhub_core::AppError;
use learnhub_store::Caller;

use crate::metrics::{track_gate_rejection, track_session_resolution};
use crate::state::AppState;

/// An authenticated caller: the resolved identity plus the access token used
/// to reach the data API on their behalf.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub identity: Identity,
    access_token: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("id", &self.identity.id)
            .field("role", &self.identity.role)
            .finish()
    }
}

impl AuthUser {
    pub fn new(identity: Identity, access_token: impl Into<String>) -> Self {
        Self {
            identity,
            access_token: access_token.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.identity.id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    /// Store caller acting with this user's access token.
    pub fn caller(&self) -> Caller<'_> {
        Caller::User(&self.access_token)
    }
}

/// Result of the one session lookup made for a request.
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<AuthUser>);

/// Pulls credentials from the request. A bearer header wins over cookies.
pub fn credentials_from_headers(headers: &HeaderMap, config: &SessionConfig) -> Credentials {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Credentials::bearer(token);
    }

    let jar = CookieJar::from_headers(headers);
    Credentials::new(
        jar.get(&config.access_cookie).map(|c| c.value().to_string()),
        jar.get(&config.refresh_cookie).map(|c| c.value().to_string()),
    )
}

/// Resolves the request's session. The second value is set when the
/// provider issued a new session that must be written back as cookies.
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> (Option<AuthUser>, Option<AuthSession>) {
    let credentials = credentials_from_headers(headers, &state.session_config);
    let outcome = state.resolver.resolve_outcome(&credentials).await;
    track_session_resolution(outcome.label());

    match outcome.into_resolution() {
        Some(resolution) => (
            Some(AuthUser::new(resolution.identity, resolution.access_token)),
            resolution.refreshed,
        ),
        None => (None, None),
    }
}

/// Resolves the session once, stores it in request extensions and rotates
/// the session cookies when the provider refreshed them.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<ResolvedSession>().is_some() {
        return next.run(req).await;
    }

    let (user, refreshed) = resolve_session(&state, req.headers()).await;
    req.extensions_mut().insert(ResolvedSession(user));

    let mut response = next.run(req).await;
    if let Some(session) = refreshed {
        append_cookies(
            response.headers_mut(),
            session_cookies(&state.session_config, &session),
        );
    }
    response
}

async fn lookup(parts: &mut Parts, state: &AppState) -> Option<AuthUser> {
    if let Some(ResolvedSession(user)) = parts.extensions.get::<ResolvedSession>() {
        return user.clone();
    }

    let (user, refreshed) = resolve_session(state, &parts.headers).await;
    if refreshed.is_some() {
        warn!("session refreshed outside the session middleware; new cookies were not sent");
    }
    parts.extensions.insert(ResolvedSession(user.clone()));
    user
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match lookup(parts, state).await {
            Some(user) => Ok(user),
            None => {
                track_gate_rejection("api");
                Err(AppError::unauthorized(
                    "Authentication required".to_string(),
                ))
            }
        }
    }
}

/// Page counterpart of [`AuthUser`]: anonymous requests are redirected to
/// the login page with the original location in `redirectTo`.
#[derive(Debug, Clone)]
pub struct PageUser(pub AuthUser);

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match lookup(parts, state).await {
            Some(user) => Ok(PageUser(user)),
            None => {
                track_gate_rejection("page");
                debug!(path = %parts.uri.path(), "no session, redirecting to login");
                Err(login_redirect(&state.session_config, &parts.uri))
            }
        }
    }
}

/// `302 Found` to `location`, or to `/` when `location` is not a valid
/// header value.
pub fn redirect_to(location: &str) -> Response {
    let location = HeaderValue::from_str(location).unwrap_or_else(|_| {
        warn!("redirect target is not a valid header value, using /");
        HeaderValue::from_static("/")
    });
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub fn login_location(config: &SessionConfig, original: &Uri) -> String {
    let original = original
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| original.path());

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", original)
        .finish();

    format!("{}?{}", config.login_path, query)
}

pub fn login_redirect(config: &SessionConfig, original: &Uri) -> Response {
    redirect_to(&login_location(config, original))
}

fn build_cookie(config: &SessionConfig, name: &str, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Access and refresh cookies for `session`.
pub fn session_cookies(config: &SessionConfig, session: &AuthSession) -> [Cookie<'static>; 2] {
    let access_max_age = if session.expires_in > 0 {
        session.expires_in
    } else {
        config.max_age_secs
    };

    [
        build_cookie(
            config,
            &config.access_cookie,
            session.access_token.clone(),
            access_max_age,
        ),
        build_cookie(
            config,
            &config.refresh_cookie,
            session.refresh_token.clone(),
            config.max_age_secs,
        ),
    ]
}

/// Expired cookies that remove the session (and any PKCE verifier).
pub fn cleared_session_cookies(config: &SessionConfig) -> [Cookie<'static>; 3] {
    [
        build_cookie(config, &config.access_cookie, String::new(), 0),
        build_cookie(config, &config.refresh_cookie, String::new(), 0),
        cleared_verifier_cookie(config),
    ]
}

/// Expired PKCE verifier cookie, sent once the code has been exchanged.
pub fn cleared_verifier_cookie(config: &SessionConfig) -> Cookie<'static> {
    build_cookie(config, &config.code_verifier_cookie, String::new(), 0)
}

pub fn session_cookie_jar(config: &SessionConfig, session: &AuthSession) -> CookieJar {
    session_cookies(config, session)
        .into_iter()
        .fold(CookieJar::new(), |jar, cookie| jar.add(cookie))
}

pub fn cleared_cookie_jar(config: &SessionConfig) -> CookieJar {
    cleared_session_cookies(config)
        .into_iter()
        .fold(CookieJar::new(), |jar, cookie| jar.add(cookie))
}

pub(crate) fn append_cookies(headers: &mut HeaderMap, cookies: impl IntoIterator<Item = Cookie<'static>>) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, cookie = %cookie.name(), "skipping unencodable cookie"),
        }
    }
}
