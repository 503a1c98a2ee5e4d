//! Static path lists consumed by the edge middleware router.
//!
//! - `public_paths`: reachable without a session; the session is never looked up
//! - `protected_paths`: pages that run their own auth gate, so the edge router
//!   lets them through untouched
//! - `skip_prefixes`: paths the edge router does not match at all (API routes,
//!   assets, ops endpoints)
//!
//! Anything in none of the lists gets its session checked at the edge.
//!
//! # Environment Variables
//!
//! - `PUBLIC_PATHS`: Comma separated override of the public list
//! - `PROTECTED_PATHS`: Comma separated override of the protected list

use std::env;

use crate::parse_list;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteConfig {
    pub public_paths: Vec<String>,
    pub protected_paths: Vec<String>,
    pub skip_prefixes: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            public_paths: to_owned(&[
                "/",
                "/login",
                "/register",
                "/forgot-password",
                "/auth/callback",
            ]),
            protected_paths: to_owned(&["/dashboard", "/admin", "/teacher"]),
            skip_prefixes: to_owned(&[
                "/api",
                "/api-docs",
                "/docs",
                "/static",
                "/favicon.ico",
                "/health",
                "/metrics",
            ]),
        }
    }
}

impl RouteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            public_paths: env::var("PUBLIC_PATHS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.public_paths),
            protected_paths: env::var("PROTECTED_PATHS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.protected_paths),
            skip_prefixes: defaults.skip_prefixes,
        }
    }
}

fn to_owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_are_disjoint() {
        let config = RouteConfig::default();
        for path in &config.public_paths {
            assert!(!config.protected_paths.contains(path));
        }
        assert!(config.public_paths.contains(&"/login".to_string()));
        assert!(config.protected_paths.contains(&"/admin".to_string()));
        assert!(config.skip_prefixes.contains(&"/api".to_string()));
    }
}
