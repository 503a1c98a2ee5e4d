use serde_json::Value;

use learnhub_auth::{Identity, Role};
use learnhub_core::AppError;

use crate::utils::rows::uuid_field;

/// Allows admins on any row and everyone else only on rows whose
/// `owner_field` is their own id.
///
/// Rows without a readable owner are treated as owned by nobody, so only
/// admins can modify them.
pub fn ensure_owner(
    identity: &Identity,
    row: &Value,
    owner_field: &str,
    resource: &str,
) -> Result<(), AppError> {
    if identity.role == Role::Admin {
        return Ok(());
    }

    if uuid_field(row, owner_field) == Some(identity.id) {
        return Ok(());
    }

    tracing::debug!(user_id = %identity.id, resource, "ownership check failed");
    Err(AppError::forbidden(format!(
        "You can only modify your own {}",
        resource
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "grace@learnhub.test".to_string(),
            name: "Grace".to_string(),
            role,
            avatar: None,
        }
    }

    #[test]
    fn test_owner_may_modify() {
        let teacher = identity(Role::Teacher);
        let row = json!({ "teacher_id": teacher.id });
        assert!(ensure_owner(&teacher, &row, "teacher_id", "classes").is_ok());
    }

    #[test]
    fn test_other_teacher_is_forbidden() {
        let teacher = identity(Role::Teacher);
        let row = json!({ "teacher_id": Uuid::new_v4() });
        let err = ensure_owner(&teacher, &row, "teacher_id", "classes").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), "You can only modify your own classes");
    }

    #[test]
    fn test_admin_may_modify_anything() {
        let admin = identity(Role::Admin);
        assert!(ensure_owner(&admin, &json!({}), "teacher_id", "classes").is_ok());
    }

    #[test]
    fn test_unowned_row_is_admin_only() {
        let teacher = identity(Role::Teacher);
        assert!(ensure_owner(&teacher, &json!({ "teacher_id": null }), "teacher_id", "classes").is_err());
    }
}
