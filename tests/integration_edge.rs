mod common;

use axum::http::StatusCode;
use common::{create_test_user, get, get_with_cookies, send, setup_test_app};
use learnhub_auth::Role;

#[tokio::test]
async fn test_public_paths_never_call_the_provider() {
    let app = setup_test_app();
    let (_, token) = create_test_user(&app, Role::Student);
    let cookies = format!("lh-access-token={}", token);

    for path in ["/", "/login", "/register", "/health"] {
        let response = send(&app, get_with_cookies(path, &cookies)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", path);
    }

    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_login_without_session_does_not_redirect() {
    let app = setup_test_app();

    let response = send(&app, get("/login?redirectTo=%2Fprofile", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.location().is_none());
    assert!(response.text.contains("/profile"));
}

#[tokio::test]
async fn test_unlisted_path_without_session_redirects_to_login() {
    let app = setup_test_app();

    let response = send(&app, get("/profile?tab=settings", None)).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.location(),
        Some("/login?redirectTo=%2Fprofile%3Ftab%3Dsettings")
    );
}

#[tokio::test]
async fn test_unlisted_path_with_session_resolves_once() {
    let app = setup_test_app();
    let (_, token) = create_test_user(&app, Role::Student);

    let response = send(
        &app,
        get_with_cookies("/profile", &format!("lh-access-token={}", token)),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("STUDENT"));
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_unknown_path_passes_through_with_session() {
    let app = setup_test_app();
    let (_, token) = create_test_user(&app, Role::Teacher);

    let anonymous = send(&app, get("/reports/weekly", None)).await;
    assert_eq!(anonymous.status, StatusCode::FOUND);

    let signed_in = send(
        &app,
        get_with_cookies("/reports/weekly", &format!("lh-access-token={}", token)),
    )
    .await;
    assert_eq!(signed_in.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_page_is_left_to_the_page_gate() {
    let app = setup_test_app();

    let response = send(&app, get("/dashboard", None)).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/login?redirectTo=%2Fdashboard"));
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_and_cookies_rotated() {
    let app = setup_test_app();
    let (user_id, _) = create_test_user(&app, Role::Student);
    app.provider.add_refresh_token("refresh-old", user_id);

    let response = send(
        &app,
        get_with_cookies(
            "/profile",
            "lh-access-token=expired; lh-refresh-token=refresh-old",
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.cookie("lh-access-token").unwrap();
    assert!(access.starts_with("lh-access-token=access-1"));
    assert!(access.contains("HttpOnly"));
    let refresh = response.cookie("lh-refresh-token").unwrap();
    assert!(refresh.starts_with("lh-refresh-token=refresh-1"));
}

#[tokio::test]
async fn test_refresh_on_gated_api_route_rotates_cookies() {
    let app = setup_test_app();
    let (user_id, _) = create_test_user(&app, Role::Teacher);
    app.provider.add_refresh_token("refresh-old", user_id);

    let response = send(
        &app,
        get_with_cookies("/api/auth/session", "lh-refresh-token=refresh-old"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["id"], user_id.to_string());
    assert!(response.cookie("lh-access-token").is_some());
}

#[tokio::test]
async fn test_provider_outage_is_treated_as_no_session() {
    let app = setup_test_app();
    let (_, token) = create_test_user(&app, Role::Admin);
    app.provider.set_failing(true);
    let cookies = format!("lh-access-token={}", token);

    let page = send(&app, get_with_cookies("/profile", &cookies)).await;
    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location(), Some("/login?redirectTo=%2Fprofile"));

    let api = send(&app, get("/api/auth/session", Some(&token))).await;
    assert_eq!(api.status, StatusCode::UNAUTHORIZED);
}
