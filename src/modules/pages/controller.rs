//! HTML shells for the browser pages. They only show who is signed in and
//! where they may go; the UI itself is served elsewhere.

use axum::{extract::Query, response::Html};
use serde::Deserialize;

use learnhub_auth::{Identity, Role};

use crate::middleware::auth::PageUser;
use crate::middleware::role::{AdminPage, TeacherPage};
use crate::utils::html::escape_html;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} | LearnHub</title></head>\n<body>\n<main>\n<h1>{}</h1>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        escape_html(title),
        body
    ))
}

fn signed_in_as(identity: &Identity) -> String {
    format!(
        "<p>Signed in as <strong>{}</strong> ({})</p>",
        escape_html(&identity.name),
        identity.role
    )
}

pub async fn home_page() -> Html<String> {
    layout(
        "LearnHub",
        "<p><a href=\"/login\">Sign in</a> or <a href=\"/register\">create an account</a>.</p>",
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginPageParams {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
    pub error: Option<String>,
}

pub async fn login_page(Query(params): Query<LoginPageParams>) -> Html<String> {
    let mut body = String::new();
    if let Some(error) = &params.error {
        body.push_str(&format!(
            "<p role=\"alert\">Sign-in failed: {}</p>\n",
            escape_html(error)
        ));
    }
    body.push_str(&format!(
        "<form method=\"post\" action=\"/api/auth/sign-in\" data-redirect-to=\"{}\"></form>",
        escape_html(params.redirect_to.as_deref().unwrap_or("/dashboard"))
    ));

    layout("Sign in", &body)
}

pub async fn register_page() -> Html<String> {
    layout(
        "Create an account",
        "<form method=\"post\" action=\"/api/auth/sign-up\"></form>",
    )
}

pub async fn dashboard_page(PageUser(auth_user): PageUser) -> Html<String> {
    let identity = &auth_user.identity;
    let links = match identity.role {
        Role::Admin => "<a href=\"/admin\">Administration</a> <a href=\"/teacher\">Teaching</a>",
        Role::Teacher => "<a href=\"/teacher\">Teaching</a>",
        Role::Student => "<a href=\"/profile\">Profile</a>",
    };

    layout(
        "Dashboard",
        &format!("{}\n<nav>{}</nav>", signed_in_as(identity), links),
    )
}

pub async fn admin_page(AdminPage(auth_user): AdminPage) -> Html<String> {
    layout(
        "Administration",
        &format!(
            "{}\n<nav><a href=\"/admin/users\">Users</a></nav>",
            signed_in_as(&auth_user.identity)
        ),
    )
}

pub async fn admin_users_page(AdminPage(auth_user): AdminPage) -> Html<String> {
    layout("Users", &signed_in_as(&auth_user.identity))
}

pub async fn teacher_page(TeacherPage(auth_user): TeacherPage) -> Html<String> {
    layout("Teaching", &signed_in_as(&auth_user.identity))
}

pub async fn profile_page(PageUser(auth_user): PageUser) -> Html<String> {
    let identity = &auth_user.identity;
    layout(
        "Profile",
        &format!(
            "{}\n<p>{}</p>",
            signed_in_as(identity),
            escape_html(&identity.email)
        ),
    )
}
