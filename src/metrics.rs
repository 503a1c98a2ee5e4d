use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
/// Returns `Ok(None)` if observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Authorization flow

/// Outcome label of a session lookup (`anonymous`, `resolved`, `refreshed`,
/// `rejected`, `provider_error`).
pub fn track_session_resolution(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("session_resolutions_total", "outcome" => outcome).increment(1);
}

/// `context` is `api` (401) or `page` (login redirect).
pub fn track_gate_rejection(context: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("auth_gate_rejections_total", "context" => context).increment(1);
}

pub fn track_role_denial(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("role_denials_total", "role" => role.to_string()).increment(1);
}

pub fn track_edge_decision(decision: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("edge_decisions_total", "decision" => decision).increment(1);
}

// Account events

pub fn track_sign_in_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_sign_ins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_sign_in_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_sign_ins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_user_registered(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total", "role" => role.to_string()).increment(1);
}

pub fn track_role_change(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("role_changes_total", "role" => role.to_string()).increment(1);
}
