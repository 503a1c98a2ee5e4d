use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use learnhub_auth::{Identity, Role};
use learnhub_models::{
    CreateAssignmentRequest, CreateClassRequest, CreateMeetingRequest, GradeRequest, Profile, Row,
    SessionResponse, SignInRequest, SignUpRequest, SubmitRequest, UpdateClassRequest,
    UpdateRoleRequest,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::sign_in,
        crate::modules::auth::controller::sign_up,
        crate::modules::auth::controller::sign_out,
        crate::modules::auth::controller::get_session,
        crate::modules::auth::controller::auth_callback,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::update_user_role,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::assignments::controller::list_assignments,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::submissions::controller::submit,
        crate::modules::submissions::controller::list_submissions,
        crate::modules::submissions::controller::my_submissions,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::meetings::controller::list_meetings,
        crate::modules::meetings::controller::create_meeting,
        crate::modules::meetings::controller::delete_meeting,
        crate::modules::health::controller::health_check,
    ),
    components(
        schemas(
            Role,
            Identity,
            SignInRequest,
            SignUpRequest,
            SessionResponse,
            Profile,
            UpdateRoleRequest,
            CreateClassRequest,
            UpdateClassRequest,
            CreateAssignmentRequest,
            SubmitRequest,
            GradeRequest,
            CreateMeetingRequest,
            Row,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-in, sign-up, sign-out and session endpoints"),
        (name = "Users", description = "Profiles and role management"),
        (name = "Classes", description = "Class management"),
        (name = "Assignments", description = "Assignments within classes"),
        (name = "Submissions", description = "Student submissions and grading"),
        (name = "Meetings", description = "Scheduled meetings"),
        (name = "Ops", description = "Operational endpoints")
    ),
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "Learning-center backend with role-based access on top of a hosted auth and data provider.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            )
        }
    }
}
