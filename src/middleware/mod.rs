//! Middleware and extractors for the authorization flow.
//!
//! # Modules
//!
//! - [`edge`]: Path classification run before routing; decides whether the
//!   session is looked up at all
//! - [`auth`]: Session lookup, the `AuthUser` / `PageUser` gate extractors
//!   and session cookies
//! - [`role`]: Role guard as a function, extractors and route layers
//!
//! # Request Flow
//!
//! 1. `edge_middleware` classifies the path; only unlisted paths resolve the
//!    session here (redirecting to login when there is none)
//! 2. `session_middleware` resolves the session once for gated API routes
//!    and protected pages, rotating cookies when the provider refreshed them
//! 3. `AuthUser` (401) or `PageUser` (login redirect) fail closed
//! 4. Role extractors compare the identity's role with the route's allow-list
//! 5. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireStaff;
//!
//! // Any signed-in user
//! async fn list_classes(auth_user: AuthUser) -> impl IntoResponse {
//!     // ...
//! }
//!
//! // Teachers and admins only
//! async fn create_class(RequireStaff(auth_user): RequireStaff) -> impl IntoResponse {
//!     // ...
//! }
//! ```

pub mod auth;
pub mod edge;
pub mod role;
