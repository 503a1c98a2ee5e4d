mod common;

use axum::http::StatusCode;
use common::{create_test_user, get, get_with_cookies, json_request, send, setup_test_app};
use learnhub_auth::Role;
use serde_json::json;

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let app = setup_test_app();

    let response = send(&app, get("/api/auth/session", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Authentication required");
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = setup_test_app();

    let response = send(&app, get("/api/classes", Some("not-a-token"))).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_repeated_resolution_yields_same_identity() {
    let app = setup_test_app();
    let (user_id, token) = create_test_user(&app, Role::Teacher);

    let first = send(&app, get("/api/auth/session", Some(&token))).await;
    let second = send(&app, get("/api/auth/session", Some(&token))).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert_eq!(first.body["user"]["id"], user_id.to_string());
    assert_eq!(first.body["user"]["role"], "TEACHER");
}

#[tokio::test]
async fn test_bearer_header_wins_over_cookie() {
    let app = setup_test_app();
    let (student_id, student_token) = create_test_user(&app, Role::Student);
    let (_, teacher_token) = create_test_user(&app, Role::Teacher);

    let mut request = get("/api/auth/session", Some(&student_token));
    request.headers_mut().insert(
        axum::http::header::COOKIE,
        format!("lh-access-token={}", teacher_token).parse().unwrap(),
    );
    let response = send(&app, request).await;

    assert_eq!(response.body["user"]["id"], student_id.to_string());
}

#[tokio::test]
async fn test_role_mismatch_is_forbidden_and_handler_never_runs() {
    let app = setup_test_app();
    let (_, token) = create_test_user(&app, Role::Student);

    let list_users = send(&app, get("/api/users", Some(&token))).await;
    assert_eq!(list_users.status, StatusCode::FORBIDDEN);
    assert_eq!(
        list_users.body["error"],
        "Access denied. Required roles: [ADMIN], but user has role: STUDENT"
    );

    let create_class = send(
        &app,
        json_request("POST", "/api/classes", Some(&token), json!({ "name": "Hacking 101" })),
    )
    .await;
    assert_eq!(create_class.status, StatusCode::FORBIDDEN);

    assert_eq!(app.store.operations(), 0);
}

#[tokio::test]
async fn test_teacher_cannot_reach_admin_api() {
    let app = setup_test_app();
    let (user_id, token) = create_test_user(&app, Role::Teacher);

    let response = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/users/{}/role", user_id),
            Some(&token),
            json!({ "role": "ADMIN" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.provider.user(user_id).unwrap().user_metadata["role"], "TEACHER");
}

#[tokio::test]
async fn test_admin_pages_redirect_other_roles_to_dashboard() {
    let app = setup_test_app();

    for role in [Role::Student, Role::Teacher] {
        let (_, token) = create_test_user(&app, role);
        let cookies = format!("lh-access-token={}", token);

        for path in ["/admin", "/admin/users"] {
            let response = send(&app, get_with_cookies(path, &cookies)).await;
            assert_eq!(response.status, StatusCode::FOUND, "{} as {}", path, role);
            assert_eq!(response.location(), Some("/dashboard"));
        }
    }
}

#[tokio::test]
async fn test_pages_allow_matching_roles() {
    let app = setup_test_app();
    let (_, admin) = create_test_user(&app, Role::Admin);
    let (_, teacher) = create_test_user(&app, Role::Teacher);
    let (_, student) = create_test_user(&app, Role::Student);
    let cookie = |token: &str| format!("lh-access-token={}", token);

    assert_eq!(send(&app, get_with_cookies("/admin", &cookie(&admin))).await.status, StatusCode::OK);
    assert_eq!(send(&app, get_with_cookies("/teacher", &cookie(&admin))).await.status, StatusCode::OK);
    assert_eq!(send(&app, get_with_cookies("/teacher", &cookie(&teacher))).await.status, StatusCode::OK);
    assert_eq!(send(&app, get_with_cookies("/dashboard", &cookie(&student))).await.status, StatusCode::OK);

    let denied = send(&app, get_with_cookies("/teacher", &cookie(&student))).await;
    assert_eq!(denied.status, StatusCode::FOUND);
    assert_eq!(denied.location(), Some("/dashboard"));
}
