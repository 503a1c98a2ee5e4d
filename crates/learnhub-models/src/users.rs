//! Profile cache rows and role management DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use learnhub_auth::{Identity, Role};

/// Row of the `profiles` table.
///
/// Mirrors identity fields for display. The provider's user metadata stays
/// the authority for roles; this row is rewritten whenever the role changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

impl From<&Identity> for Profile {
    fn from(identity: &Identity) -> Self {
        Profile {
            id: identity.id,
            email: identity.email.clone(),
            full_name: identity.name.clone(),
            role: identity.role,
            avatar_url: identity.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Only list profiles with this role.
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_identity() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "grace@learnhub.test".to_string(),
            name: "Grace".to_string(),
            role: Role::Teacher,
            avatar: None,
        };
        let profile = Profile::from(&identity);
        assert_eq!(profile.id, identity.id);
        assert_eq!(profile.full_name, "Grace");
        assert_eq!(profile.role, Role::Teacher);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "TEACHER");
    }

    #[test]
    fn test_update_role_request_rejects_unknown_role() {
        assert!(serde_json::from_str::<UpdateRoleRequest>(r#"{"role":"PRINCIPAL"}"#).is_err());
        let request: UpdateRoleRequest = serde_json::from_str(r#"{"role":"ADMIN"}"#).unwrap();
        assert_eq!(request.role, Role::Admin);
    }
}
