//! # LearnHub Auth
//!
//! Identity types and session resolution for the LearnHub API.
//!
//! LearnHub does not own users or sessions. A GoTrue-compatible provider
//! does, and this crate is the only place that talks to it:
//!
//! - [`identity`]: [`Role`] and the resolved [`Identity`]
//! - [`provider`]: The [`SessionProvider`] seam and its error type
//! - [`gotrue`]: HTTP implementation of the provider seam
//! - [`resolver`]: [`SessionResolver`], credentials in, identity (or nothing) out
//!
//! With the `test-utils` feature, `testing::MockProvider` offers an
//! in-memory provider that counts calls and can simulate outages.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use learnhub_auth::{Credentials, GoTrueClient, SessionResolver};
//!
//! let provider = Arc::new(GoTrueClient::new(provider_config)?);
//! let resolver = SessionResolver::new(provider);
//!
//! match resolver.resolve(&Credentials::bearer(token)).await {
//!     Some(resolution) => println!("hello {}", resolution.identity.name),
//!     None => println!("not signed in"),
//! }
//! ```

pub mod gotrue;
pub mod identity;
pub mod provider;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use gotrue::GoTrueClient;
pub use identity::{Identity, Role};
pub use provider::{
    AuthSession, ProviderError, ProviderUser, SessionProvider, SignUp, SignUpMetadata,
};
pub use resolver::{Credentials, Resolution, ResolveOutcome, SessionResolver};
