//! # LearnHub Config
//!
//! Configuration types for the LearnHub API, loaded from environment
//! variables (call `dotenvy::dotenv()` first to pick up a `.env` file).
//!
//! - [`provider`]: Hosted auth/data provider endpoints and keys
//! - [`session`]: Session cookie names and redirect targets
//! - [`routes`]: Public and protected path lists for the edge router
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! # Example
//!
//! ```ignore
//! use learnhub_config::{CorsConfig, ProviderConfig, RouteConfig, SessionConfig};
//!
//! let provider = ProviderConfig::from_env()?;
//! let session = SessionConfig::from_env();
//! let routes = RouteConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod provider;
pub mod routes;
pub mod session;

pub use cors::CorsConfig;
pub use provider::{ConfigError, ProviderConfig};
pub use routes::RouteConfig;
pub use session::SessionConfig;

/// Reads a comma separated list, trimming entries and dropping empty ones.
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
