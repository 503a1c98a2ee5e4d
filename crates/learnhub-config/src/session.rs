//! Session cookie configuration.
//!
//! # Environment Variables
//!
//! - `SESSION_ACCESS_COOKIE`: Access token cookie name (default: `lh-access-token`)
//! - `SESSION_REFRESH_COOKIE`: Refresh token cookie name (default: `lh-refresh-token`)
//! - `SESSION_VERIFIER_COOKIE`: PKCE code verifier cookie read by the auth callback
//!   (default: `lh-code-verifier`)
//! - `SESSION_COOKIE_SECURE`: Mark cookies `Secure` (default: true)
//! - `SESSION_MAX_AGE_SECS`: Refresh cookie lifetime (default: 604800, 7 days)
//! - `LOGIN_PATH`: Where unauthenticated page requests are sent (default: `/login`)
//! - `DEFAULT_REDIRECT`: Landing page after login or a role denial (default: `/dashboard`)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub access_cookie: String,
    pub refresh_cookie: String,
    pub code_verifier_cookie: String,
    pub secure: bool,
    pub max_age_secs: i64,
    pub login_path: String,
    pub default_redirect: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_cookie: "lh-access-token".to_string(),
            refresh_cookie: "lh-refresh-token".to_string(),
            code_verifier_cookie: "lh-code-verifier".to_string(),
            secure: true,
            max_age_secs: 604800,
            login_path: "/login".to_string(),
            default_redirect: "/dashboard".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            access_cookie: env::var("SESSION_ACCESS_COOKIE").unwrap_or(defaults.access_cookie),
            refresh_cookie: env::var("SESSION_REFRESH_COOKIE").unwrap_or(defaults.refresh_cookie),
            code_verifier_cookie: env::var("SESSION_VERIFIER_COOKIE")
                .unwrap_or(defaults.code_verifier_cookie),
            secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.secure),
            max_age_secs: env::var("SESSION_MAX_AGE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_age_secs),
            login_path: env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            default_redirect: env::var("DEFAULT_REDIRECT").unwrap_or(defaults.default_redirect),
        }
    }
}
