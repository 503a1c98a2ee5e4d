//! Edge router: decides per request path whether the session is looked up
//! before routing.
//!
//! | Path class          | Session lookup | Outcome                                   |
//! |---------------------|----------------|-------------------------------------------|
//! | `Public`            | never          | pass through                              |
//! | `ProtectedByPage`   | never          | pass through, the page runs its own gate  |
//! | `NeedsCheck`        | yes            | redirect to login, or pass with session   |
//!
//! Protected pages are deliberately left to their page-level guards, so
//! they are checked once by the page and not here.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use learnhub_config::RouteConfig;

use crate::metrics::track_edge_decision;
use crate::middleware::auth::{
    ResolvedSession, append_cookies, login_redirect, resolve_session, session_cookies,
};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    ProtectedByPage,
    NeedsCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDecision {
    PassThrough,
    RedirectToLogin,
    PassThroughWithSession,
}

impl EdgeDecision {
    pub fn label(&self) -> &'static str {
        match self {
            EdgeDecision::PassThrough => "pass_through",
            EdgeDecision::RedirectToLogin => "redirect_to_login",
            EdgeDecision::PassThroughWithSession => "pass_through_with_session",
        }
    }
}

/// Whether `path` is `entry` or lies below it. `/` only matches itself.
pub fn path_matches(path: &str, entry: &str) -> bool {
    if entry == "/" {
        return path == "/";
    }

    let entry = entry.trim_end_matches('/');
    match path.strip_prefix(entry) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn classify(config: &RouteConfig, path: &str) -> PathClass {
    let listed = |entries: &[String]| entries.iter().any(|entry| path_matches(path, entry));

    if listed(&config.skip_prefixes) || listed(&config.public_paths) {
        PathClass::Public
    } else if listed(&config.protected_paths) {
        PathClass::ProtectedByPage
    } else {
        PathClass::NeedsCheck
    }
}

/// `has_session` is only meaningful for [`PathClass::NeedsCheck`].
pub fn decide(class: PathClass, has_session: bool) -> EdgeDecision {
    match (class, has_session) {
        (PathClass::Public | PathClass::ProtectedByPage, _) => EdgeDecision::PassThrough,
        (PathClass::NeedsCheck, false) => EdgeDecision::RedirectToLogin,
        (PathClass::NeedsCheck, true) => EdgeDecision::PassThroughWithSession,
    }
}

pub async fn edge_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let class = classify(&state.route_config, req.uri().path());
    if class != PathClass::NeedsCheck {
        track_edge_decision(decide(class, false).label());
        return next.run(req).await;
    }

    let (user, refreshed) = resolve_session(&state, req.headers()).await;
    let decision = decide(class, user.is_some());
    track_edge_decision(decision.label());

    let Some(user) = user else {
        debug!(path = %req.uri().path(), "no session at the edge, redirecting to login");
        return login_redirect(&state.session_config, req.uri());
    };

    req.extensions_mut().insert(ResolvedSession(Some(user)));
    let mut response = next.run(req).await;

    if let Some(session) = refreshed {
        append_cookies(
            response.headers_mut(),
            session_cookies(&state.session_config, &session),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_matches_only_itself() {
        assert!(path_matches("/", "/"));
        assert!(!path_matches("/profile", "/"));
    }

    #[test]
    fn test_entries_match_sub_paths_on_segment_boundary() {
        assert!(path_matches("/admin", "/admin"));
        assert!(path_matches("/admin/users", "/admin"));
        assert!(path_matches("/admin/", "/admin/"));
        assert!(!path_matches("/administer", "/admin"));
        assert!(!path_matches("/apiary", "/api"));
    }

    #[test]
    fn test_classify_defaults() {
        let config = RouteConfig::default();
        assert_eq!(classify(&config, "/"), PathClass::Public);
        assert_eq!(classify(&config, "/login"), PathClass::Public);
        assert_eq!(classify(&config, "/auth/callback"), PathClass::Public);
        assert_eq!(classify(&config, "/api/classes"), PathClass::Public);
        assert_eq!(classify(&config, "/health"), PathClass::Public);
        assert_eq!(classify(&config, "/dashboard"), PathClass::ProtectedByPage);
        assert_eq!(classify(&config, "/admin/users"), PathClass::ProtectedByPage);
        assert_eq!(classify(&config, "/teacher"), PathClass::ProtectedByPage);
        assert_eq!(classify(&config, "/profile"), PathClass::NeedsCheck);
        assert_eq!(classify(&config, "/settings/billing"), PathClass::NeedsCheck);
    }

    #[test]
    fn test_public_wins_over_protected() {
        let config = RouteConfig {
            public_paths: vec!["/admin/help".to_string()],
            protected_paths: vec!["/admin".to_string()],
            skip_prefixes: vec![],
        };
        assert_eq!(classify(&config, "/admin/help"), PathClass::Public);
        assert_eq!(classify(&config, "/admin"), PathClass::ProtectedByPage);
    }

    #[test]
    fn test_decisions() {
        assert_eq!(decide(PathClass::Public, false), EdgeDecision::PassThrough);
        assert_eq!(decide(PathClass::Public, true), EdgeDecision::PassThrough);
        assert_eq!(decide(PathClass::ProtectedByPage, false), EdgeDecision::PassThrough);
        assert_eq!(decide(PathClass::NeedsCheck, false), EdgeDecision::RedirectToLogin);
        assert_eq!(
            decide(PathClass::NeedsCheck, true),
            EdgeDecision::PassThroughWithSession
        );
    }
}
