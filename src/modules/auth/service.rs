use tracing::{instrument, warn};
use url::Url;

use learnhub_auth::{
    AuthSession, Identity, ProviderError, SessionProvider, SignUp, SignUpMetadata,
};
use learnhub_core::AppError;
use learnhub_models::{Profile, SignInRequest, SignUpRequest};
use learnhub_store::DataStore;

use crate::metrics::{track_sign_in_failure, track_sign_in_success, track_user_registered};
use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(provider, dto), fields(email = %dto.email))]
    pub async fn sign_in(
        provider: &dyn SessionProvider,
        dto: SignInRequest,
    ) -> Result<AuthSession, AppError> {
        match provider.sign_in_with_password(&dto.email, &dto.password).await {
            Ok(session) => {
                let identity = Identity::from(&session.user);
                track_sign_in_success(identity.role.as_str());
                Ok(session)
            }
            Err(err) => {
                let reason = match err {
                    ProviderError::InvalidCredentials | ProviderError::InvalidSession => {
                        "invalid_credentials"
                    }
                    _ => "provider_error",
                };
                track_sign_in_failure(reason);
                Err(err.into())
            }
        }
    }

    /// Registers the user with the provider and writes their profile cache
    /// row. A failed cache write does not fail the sign-up.
    #[instrument(skip(provider, store, dto), fields(email = %dto.email))]
    pub async fn sign_up(
        provider: &dyn SessionProvider,
        store: &dyn DataStore,
        dto: SignUpRequest,
    ) -> Result<SignUp, AppError> {
        let metadata = SignUpMetadata {
            full_name: dto.name.clone(),
            role: dto.requested_role(),
        };

        let sign_up = provider.sign_up(&dto.email, &dto.password, &metadata).await?;

        let identity = Identity::from(&sign_up.user);
        if let Err(e) = UserService::cache_profile(store, &Profile::from(&identity)).await {
            warn!(user_id = %identity.id, error = %e.error, "failed to write profile cache");
        }

        track_user_registered(identity.role.as_str());
        Ok(sign_up)
    }

    /// Revokes the session at the provider. Failures are logged only; the
    /// caller's cookies are cleared either way.
    #[instrument(skip_all)]
    pub async fn sign_out(provider: &dyn SessionProvider, access_token: Option<&str>) {
        let Some(access_token) = access_token else {
            return;
        };

        if let Err(e) = provider.sign_out(access_token).await {
            warn!(error = %e, "provider sign-out failed");
        }
    }

    #[instrument(skip_all)]
    pub async fn exchange_code(
        provider: &dyn SessionProvider,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, ProviderError> {
        provider.exchange_code(code, code_verifier).await
    }
}

const SAME_SITE_BASE: &str = "http://learnhub.invalid/";

/// Post-login destination: `next` when it is a same-site relative path,
/// `default` otherwise.
///
/// Paths with control characters are refused: browsers drop tabs and
/// newlines before resolving, so `/\t/host` would become `//host`.
pub fn safe_next(next: Option<&str>, default: &str) -> String {
    match next {
        Some(next) if is_same_site_path(next) => next.to_string(),
        _ => default.to_string(),
    }
}

fn is_same_site_path(next: &str) -> bool {
    if !next.starts_with('/')
        || next.starts_with("//")
        || next.contains('\\')
        || next.chars().any(char::is_control)
    {
        return false;
    }

    let Ok(base) = Url::parse(SAME_SITE_BASE) else {
        return false;
    };
    base.join(next)
        .map(|resolved| resolved.origin() == base.origin())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use learnhub_auth::Role;
    use learnhub_auth::testing::MockProvider;
    use learnhub_store::MemoryStore;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/classes/1?tab=work"), "/dashboard"), "/classes/1?tab=work");
        assert_eq!(safe_next(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("https://evil.test"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("//evil.test/path"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/\\evil.test"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some(""), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/\t/evil.test"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/\n/evil.test"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/a\r\nb"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/classes#work"), "/dashboard"), "/classes#work");
    }

    #[tokio::test]
    async fn test_sign_up_writes_profile_cache() {
        let provider = MockProvider::new();
        let store = MemoryStore::new();
        let dto = SignUpRequest {
            email: "new@learnhub.test".to_string(),
            password: "password123".to_string(),
            name: "New Teacher".to_string(),
            role: Some(Role::Teacher),
        };

        let sign_up = AuthService::sign_up(&provider, &store, dto).await.unwrap();

        let rows = store.rows("profiles");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], sign_up.user.id.to_string());
        assert_eq!(rows[0]["role"], "TEACHER");
        assert_eq!(rows[0]["full_name"], "New Teacher");
    }

    #[tokio::test]
    async fn test_sign_in_rejection_is_unauthorized() {
        let provider = MockProvider::new();
        let dto = SignInRequest {
            email: "nobody@learnhub.test".to_string(),
            password: "wrong".to_string(),
        };

        let err = AuthService::sign_in(&provider, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
