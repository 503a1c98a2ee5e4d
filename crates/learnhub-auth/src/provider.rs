//! The external auth provider seam.
//!
//! [`SessionProvider`] is everything LearnHub asks of the hosted auth
//! service. Sessions are opaque: tokens are handed to the provider and the
//! provider answers with a user or an error. Nothing here decodes a token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use learnhub_core::AppError;

use crate::identity::Role;

/// User record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl ProviderUser {
    /// String value of a `user_metadata` key, if present and non-empty.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// A provider session (access + refresh token pair).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: ProviderUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("user", &self.user.id)
            .finish()
    }
}

/// Result of a sign-up. The provider only returns a session when email
/// confirmation is disabled for the project.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: ProviderUser,
    pub session: Option<AuthSession>,
}

/// Extra profile data sent with a sign-up, stored in `user_metadata`.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("session is invalid or expired")]
    InvalidSession,
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("request rejected by auth provider: {0}")]
    Rejected(String),
    #[error("auth provider is not configured for {0}")]
    NotConfigured(&'static str),
    #[error("auth provider unreachable: {0}")]
    Transport(String),
    #[error("unexpected auth provider response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidSession | ProviderError::InvalidCredentials => {
                AppError::unauthorized(err.to_string())
            }
            ProviderError::Rejected(message) => AppError::bad_request(anyhow::anyhow!(message)),
            ProviderError::NotConfigured(_) => AppError::service_unavailable(err.to_string()),
            ProviderError::Transport(_) | ProviderError::Unexpected { .. } => {
                AppError::bad_gateway(err)
            }
        }
    }
}

/// Operations consumed from the hosted auth provider.
///
/// Implementations must be cheap to share (`Arc<dyn SessionProvider>`), and
/// one instance is built per process and injected into application state.
#[async_trait]
pub trait SessionProvider: Send + Sync + 'static {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Looks up the user owning `access_token`.
    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError>;

    /// Trades a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError>;

    /// Completes an OAuth / magic-link flow.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, ProviderError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ProviderError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUp, ProviderError>;

    /// Revokes the session owning `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Writes `user_metadata.role` through the admin API.
    async fn update_user_role(&self, user_id: Uuid, role: Role)
    -> Result<ProviderUser, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_provider_user_deserializes_without_metadata() {
        let user: ProviderUser = serde_json::from_value(json!({
            "id": "7b0c3b4e-58f6-4c3a-9f2b-1c2d3e4f5a6b",
            "email": "grace@learnhub.test"
        }))
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("grace@learnhub.test"));
        assert_eq!(user.metadata_str("role"), None);
    }

    #[test]
    fn test_metadata_str_ignores_blank_and_non_string() {
        let user = ProviderUser {
            id: Uuid::new_v4(),
            email: None,
            user_metadata: json!({ "name": "  ", "role": 3 }),
        };
        assert_eq!(user.metadata_str("name"), None);
        assert_eq!(user.metadata_str("role"), None);
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: "access-secret".to_string(),
            refresh_token: "refresh-secret".to_string(),
            expires_in: 3600,
            token_type: "bearer".to_string(),
            user: ProviderUser {
                id: Uuid::new_v4(),
                email: None,
                user_metadata: Value::Null,
            },
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("refresh-secret"));
    }

    #[test]
    fn test_error_status_mapping() {
        let status = |err: ProviderError| AppError::from(err).status;
        assert_eq!(status(ProviderError::InvalidSession), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ProviderError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(ProviderError::Rejected("weak password".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ProviderError::NotConfigured("admin updates")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(ProviderError::Transport("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_rejection_keeps_provider_message() {
        let err = AppError::from(ProviderError::Rejected("User already registered".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "User already registered");
    }
}
