//! HTTP client for a GoTrue-compatible auth API (`{SUPABASE_URL}/auth/v1`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use uuid::Uuid;

use learnhub_config::ProviderConfig;

use crate::identity::Role;
use crate::provider::{
    AuthSession, ProviderError, ProviderUser, SessionProvider, SignUp, SignUpMetadata,
};

#[derive(Clone, Debug)]
pub struct GoTrueClient {
    http: Client,
    config: ProviderConfig,
}

impl GoTrueClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.auth_url(), path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.config.anon_key)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }

    /// Password and refresh grants on `/token`.
    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<AuthSession, ProviderError> {
        let builder = self
            .request(self.http.post(self.endpoint("/token")))
            .query(&[("grant_type", grant_type)])
            .json(&body);

        let response = self.send(builder).await?;
        read_json(response, |status, message| match status {
            StatusCode::BAD_REQUEST if grant_type == "password" => ProviderError::InvalidCredentials,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::InvalidSession
            }
            _ => unexpected(status, message),
        })
        .await
    }
}

#[async_trait]
impl SessionProvider for GoTrueClient {
    fn name(&self) -> &'static str {
        "gotrue"
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let builder = self
            .request(self.http.get(self.endpoint("/user")))
            .bearer_auth(access_token);

        let response = self.send(builder).await?;
        read_json(response, |status, message| match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::InvalidSession,
            _ => unexpected(status, message),
        })
        .await
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    #[instrument(skip_all)]
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, ProviderError> {
        self.token_grant(
            "pkce",
            json!({ "auth_code": code, "code_verifier": code_verifier }),
        )
        .await
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ProviderError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUp, ProviderError> {
        let builder = self
            .request(self.http.post(self.endpoint("/signup")))
            .json(&json!({ "email": email, "password": password, "data": metadata }));

        let response = self.send(builder).await?;
        let body: Value = read_json(response, |status, message| match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::Rejected(message)
            }
            _ => unexpected(status, message),
        })
        .await?;

        parse_sign_up(body)
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let builder = self
            .request(self.http.post(self.endpoint("/logout")))
            .bearer_auth(access_token);

        let response = self.send(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = error_message(response).await;
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::InvalidSession,
            _ => unexpected(status, message),
        })
    }

    #[instrument(skip(self))]
    async fn update_user_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<ProviderUser, ProviderError> {
        let service_key = self
            .config
            .service_role_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("admin user updates"))?;

        let builder = self
            .http
            .put(self.endpoint(&format!("/admin/users/{}", user_id)))
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .json(&json!({ "user_metadata": { "role": role } }));

        let response = self.send(builder).await?;
        read_json(response, |status, message| match status {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::Rejected(message)
            }
            _ => unexpected(status, message),
        })
        .await
    }
}

fn unexpected(status: StatusCode, message: String) -> ProviderError {
    ProviderError::Unexpected {
        status: status.as_u16(),
        message,
    }
}

/// Decodes a success body, or maps the failure status through `on_error`.
async fn read_json<T, F>(response: Response, on_error: F) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    F: FnOnce(StatusCode, String) -> ProviderError,
{
    let status = response.status();
    if !status.is_success() {
        let message = error_message(response).await;
        debug!(status = %status.as_u16(), %message, "auth provider returned an error");
        return Err(on_error(status, message));
    }

    response.json::<T>().await.map_err(|e| ProviderError::Unexpected {
        status: status.as_u16(),
        message: format!("malformed response body: {}", e),
    })
}

/// GoTrue reports errors under a handful of keys depending on the endpoint.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// `/signup` answers with a full session when confirmation is disabled and
/// with the bare user otherwise.
fn parse_sign_up(body: Value) -> Result<SignUp, ProviderError> {
    let malformed = |e: serde_json::Error| ProviderError::Unexpected {
        status: 200,
        message: format!("malformed sign-up response: {}", e),
    };

    if body.get("access_token").is_some() {
        let session: AuthSession = serde_json::from_value(body).map_err(malformed)?;
        return Ok(SignUp {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user: ProviderUser = serde_json::from_value(body).map_err(malformed)?;
    Ok(SignUp {
        user,
        session: None,
    })
}
