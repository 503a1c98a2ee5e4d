//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use learnhub_auth::{Identity, Role};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email)]
    #[schema(example = "ada@learnhub.test")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Self-service registration.
///
/// `role` defaults to `STUDENT`. Only `STUDENT` and `TEACHER` can be
/// requested; administrators are promoted through the admin role endpoint.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_requested_role"))]
pub struct SignUpRequest {
    #[validate(email)]
    #[schema(example = "ada@learnhub.test")]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub role: Option<Role>,
}

impl SignUpRequest {
    pub fn requested_role(&self) -> Role {
        self.role.unwrap_or(Role::Student)
    }
}

fn validate_requested_role(request: &SignUpRequest) -> Result<(), ValidationError> {
    if request.role == Some(Role::Admin) {
        let mut error = ValidationError::new("role_not_allowed");
        error.message = Some("ADMIN cannot be requested at sign-up".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(role: Option<Role>) -> SignUpRequest {
        SignUpRequest {
            email: "ada@learnhub.test".to_string(),
            password: "password123".to_string(),
            name: "Ada".to_string(),
            role,
        }
    }

    #[test]
    fn test_sign_in_request_validation() {
        let valid = SignInRequest {
            email: "ada@learnhub.test".to_string(),
            password: "x".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignInRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = SignInRequest {
            email: "ada@learnhub.test".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_sign_up_role_defaults_to_student() {
        let request = sign_up(None);
        assert!(request.validate().is_ok());
        assert_eq!(request.requested_role(), Role::Student);
        assert_eq!(sign_up(Some(Role::Teacher)).requested_role(), Role::Teacher);
    }

    #[test]
    fn test_sign_up_cannot_claim_admin() {
        assert!(sign_up(Some(Role::Admin)).validate().is_err());
    }

    #[test]
    fn test_sign_up_short_password() {
        let mut request = sign_up(None);
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_sign_up_role_deserializes_upper_case() {
        let request: SignUpRequest = serde_json::from_str(
            r#"{"email":"a@b.test","password":"password123","name":"A","role":"TEACHER"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Some(Role::Teacher));
    }
}
