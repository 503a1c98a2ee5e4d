use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::session_middleware;
use crate::middleware::edge::edge_middleware;
use crate::middleware::role::require_admin;
use crate::modules::assignments::{init_assignments_router, init_class_assignments_router};
use crate::modules::auth::{init_auth_router, init_callback_router, init_session_router};
use crate::modules::classes::init_classes_router;
use crate::modules::health::init_health_router;
use crate::modules::meetings::init_meetings_router;
use crate::modules::pages::{init_protected_pages_router, init_public_pages_router};
use crate::modules::submissions::{init_assignment_submissions_router, init_submissions_router};
use crate::modules::users::{init_admin_users_router, init_users_router};
use crate::state::AppState;

/// `/api` routes. Everything except the public `/api/auth` routes resolves
/// the session once through `session_middleware`.
fn init_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest(
            "/users",
            init_users_router().merge(
                init_admin_users_router()
                    .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
            ),
        )
        .nest(
            "/classes",
            init_classes_router().nest("/{id}/assignments", init_class_assignments_router()),
        )
        .nest(
            "/assignments",
            init_assignments_router().nest("/{id}/submissions", init_assignment_submissions_router()),
        )
        .nest("/submissions", init_submissions_router())
        .nest("/meetings", init_meetings_router())
        .merge(init_session_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .nest("/auth", init_auth_router())
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .merge(init_public_pages_router())
        .merge(init_protected_pages_router().route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        )))
        .merge(init_callback_router())
        .merge(init_health_router())
        .nest("/api", init_api_router(&state))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            edge_middleware,
        ))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
