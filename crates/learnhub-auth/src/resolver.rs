//! Session resolution.
//!
//! [`SessionResolver`] turns request credentials into an [`Identity`] by
//! asking the provider. It never fails: a missing, rejected or
//! unverifiable session all come back as "no identity". Provider outages are
//! logged and counted as unauthenticated rather than surfaced to the caller.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::identity::Identity;
use crate::provider::{AuthSession, ProviderError, SessionProvider};

/// Tokens pulled from an inbound request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        let non_empty = |token: Option<String>| token.filter(|t| !t.trim().is_empty());
        Self {
            access_token: non_empty(access_token),
            refresh_token: non_empty(refresh_token),
        }
    }

    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new(Some(access_token.into()), None)
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A successfully resolved session.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub identity: Identity,
    /// Token to forward to the data API on the user's behalf.
    pub access_token: String,
    /// Set when the access token had expired and the provider issued a new
    /// session from the refresh token. Callers that own the response should
    /// write it back to the client.
    pub refreshed: Option<AuthSession>,
}

/// Detailed outcome, kept for logging and metrics.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    /// No credentials on the request; the provider was not called.
    Anonymous,
    Resolved(Resolution),
    /// The provider rejected the session.
    Rejected,
    /// The provider could not be asked (outage, malformed answer).
    ProviderError(ProviderError),
}

impl ResolveOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ResolveOutcome::Anonymous => "anonymous",
            ResolveOutcome::Resolved(r) if r.refreshed.is_some() => "refreshed",
            ResolveOutcome::Resolved(_) => "resolved",
            ResolveOutcome::Rejected => "rejected",
            ResolveOutcome::ProviderError(_) => "provider_error",
        }
    }

    pub fn into_resolution(self) -> Option<Resolution> {
        match self {
            ResolveOutcome::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl SessionResolver {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn SessionProvider> {
        &self.provider
    }

    /// Resolves `credentials` to an identity, or `None`.
    pub async fn resolve(&self, credentials: &Credentials) -> Option<Resolution> {
        self.resolve_outcome(credentials).await.into_resolution()
    }

    #[instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn resolve_outcome(&self, credentials: &Credentials) -> ResolveOutcome {
        if let Some(access_token) = credentials.access_token.as_deref() {
            match self.provider.get_user(access_token).await {
                Ok(user) => {
                    return ResolveOutcome::Resolved(Resolution {
                        identity: Identity::from(&user),
                        access_token: access_token.to_string(),
                        refreshed: None,
                    });
                }
                Err(ProviderError::InvalidSession) => {
                    debug!("access token rejected by provider");
                }
                Err(err) => return provider_failure(err),
            }
        }

        match credentials.refresh_token.as_deref() {
            Some(refresh_token) => self.refresh(refresh_token).await,
            None if credentials.access_token.is_some() => ResolveOutcome::Rejected,
            None => ResolveOutcome::Anonymous,
        }
    }

    async fn refresh(&self, refresh_token: &str) -> ResolveOutcome {
        match self.provider.refresh_session(refresh_token).await {
            Ok(session) => {
                debug!("session refreshed");
                ResolveOutcome::Resolved(Resolution {
                    identity: Identity::from(&session.user),
                    access_token: session.access_token.clone(),
                    refreshed: Some(session),
                })
            }
            Err(ProviderError::InvalidSession | ProviderError::InvalidCredentials) => {
                debug!("refresh token rejected by provider");
                ResolveOutcome::Rejected
            }
            Err(err) => provider_failure(err),
        }
    }
}

fn provider_failure(err: ProviderError) -> ResolveOutcome {
    warn!(error = %err, "session lookup failed; treating request as unauthenticated");
    ResolveOutcome::ProviderError(err)
}
