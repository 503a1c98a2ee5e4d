//! In-memory [`SessionProvider`] for tests (enable the `test-utils` feature).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::identity::Role;
use crate::provider::{
    AuthSession, ProviderError, ProviderUser, SessionProvider, SignUp, SignUpMetadata,
};

#[derive(Default)]
struct Registry {
    users: HashMap<Uuid, ProviderUser>,
    access_tokens: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, Uuid>,
    passwords: HashMap<String, (String, Uuid)>,
    codes: HashMap<String, Uuid>,
    issued: usize,
}

impl Registry {
    fn issue_session(&mut self, user_id: Uuid) -> Option<AuthSession> {
        let user = self.users.get(&user_id)?.clone();
        self.issued += 1;
        let access_token = format!("access-{}", self.issued);
        let refresh_token = format!("refresh-{}", self.issued);
        self.access_tokens.insert(access_token.clone(), user_id);
        self.refresh_tokens.insert(refresh_token.clone(), user_id);

        Some(AuthSession {
            access_token,
            refresh_token,
            expires_in: 3600,
            token_type: "bearer".to_string(),
            user,
        })
    }
}

/// Provider double that keeps users and tokens in memory and counts calls.
pub struct MockProvider {
    registry: Mutex<Registry>,
    calls: AtomicUsize,
    failing: AtomicBool,
    auto_confirm: AtomicBool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            auto_confirm: AtomicBool::new(true),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    /// Registers a user reachable through `access_token`.
    pub fn add_user(&self, email: &str, role: Role, access_token: &str) -> ProviderUser {
        let user = ProviderUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: json!({
                "full_name": email.split('@').next().unwrap_or_default(),
                "role": role,
            }),
        };

        let mut registry = self.registry();
        registry.users.insert(user.id, user.clone());
        registry.access_tokens.insert(access_token.to_string(), user.id);
        user
    }

    pub fn add_password(&self, email: &str, password: &str, user_id: Uuid) {
        self.registry()
            .passwords
            .insert(email.to_string(), (password.to_string(), user_id));
    }

    pub fn add_refresh_token(&self, refresh_token: &str, user_id: Uuid) {
        self.registry()
            .refresh_tokens
            .insert(refresh_token.to_string(), user_id);
    }

    pub fn add_code(&self, code: &str, user_id: Uuid) {
        self.registry().codes.insert(code.to_string(), user_id);
    }

    pub fn user(&self, user_id: Uuid) -> Option<ProviderUser> {
        self.registry().users.get(&user_id).cloned()
    }

    pub fn is_token_active(&self, access_token: &str) -> bool {
        self.registry().access_tokens.contains_key(access_token)
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// When set, every call fails with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// When unset, sign-ups return no session (email confirmation pending).
    pub fn set_auto_confirm(&self, auto_confirm: bool) {
        self.auto_confirm.store(auto_confirm, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        self.enter()?;
        let registry = self.registry();
        registry
            .access_tokens
            .get(access_token)
            .and_then(|id| registry.users.get(id))
            .cloned()
            .ok_or(ProviderError::InvalidSession)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        let user_id = registry
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(ProviderError::InvalidSession)?;
        registry
            .issue_session(user_id)
            .ok_or(ProviderError::InvalidSession)
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<AuthSession, ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        let user_id = registry
            .codes
            .remove(code)
            .ok_or(ProviderError::InvalidSession)?;
        registry
            .issue_session(user_id)
            .ok_or(ProviderError::InvalidSession)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        let user_id = match registry.passwords.get(email) {
            Some((expected, user_id)) if expected == password => *user_id,
            _ => return Err(ProviderError::InvalidCredentials),
        };
        registry
            .issue_session(user_id)
            .ok_or(ProviderError::InvalidCredentials)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUp, ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        if registry.passwords.contains_key(email) {
            return Err(ProviderError::Rejected("User already registered".to_string()));
        }

        let user = ProviderUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: json!({ "full_name": metadata.full_name, "role": metadata.role }),
        };
        registry.users.insert(user.id, user.clone());
        registry
            .passwords
            .insert(email.to_string(), (password.to_string(), user.id));

        let session = if self.auto_confirm.load(Ordering::SeqCst) {
            registry.issue_session(user.id)
        } else {
            None
        };

        Ok(SignUp { user, session })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        match registry.access_tokens.remove(access_token) {
            Some(user_id) => {
                registry.refresh_tokens.retain(|_, id| *id != user_id);
                Ok(())
            }
            None => Err(ProviderError::InvalidSession),
        }
    }

    async fn update_user_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<ProviderUser, ProviderError> {
        self.enter()?;
        let mut registry = self.registry();
        let user = registry
            .users
            .get_mut(&user_id)
            .ok_or_else(|| ProviderError::Rejected("User not found".to_string()))?;
        user.user_metadata["role"] = json!(role);
        Ok(user.clone())
    }
}
