//! # LearnHub API
//!
//! HTTP backend of a learning center built with Rust and Axum. Identities,
//! sessions and rows live in a hosted Postgres project (GoTrue-compatible
//! auth API and PostgREST-compatible data API); this service resolves the
//! caller's session through the provider and enforces role-based access
//! before forwarding business operations.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── learnhub-core/     # AppError
//! ├── learnhub-config/   # Provider, session, route and CORS configuration
//! ├── learnhub-auth/     # Roles, identities, provider client, session resolver
//! ├── learnhub-store/    # Data API client and in-memory store
//! └── learnhub-models/   # Request/response DTOs
//! src/
//! ├── middleware/        # Edge router, auth gate, role guard
//! ├── modules/           # Feature modules
//! │   ├── auth/          # Sign-in, sign-up, sign-out, callback, session
//! │   ├── users/         # Profiles and role management
//! │   ├── classes/       # Classes
//! │   ├── assignments/   # Assignments
//! │   ├── submissions/   # Submissions and grading
//! │   ├── meetings/      # Meetings
//! │   ├── pages/         # HTML page shells
//! │   └── health/        # Liveness
//! └── ...
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic against the [`DataStore`](learnhub_store::DataStore)
//! - `router.rs`: Axum router configuration
//!
//! ## Authorization Flow
//!
//! ```text
//! request → edge router → session resolver → auth gate → role guard → handler
//! ```
//!
//! | Role    | Can |
//! |---------|-----|
//! | Admin   | Everything, including role changes |
//! | Teacher | Manage own classes, assignments, meetings; grade submissions |
//! | Student | Read classes, submit work, see own submissions |
//!
//! The role comes from the provider's user metadata. The `profiles` table is
//! a display cache that is rewritten whenever the role changes.
//!
//! ## Quick Start
//!
//! ```bash
//! SUPABASE_URL=https://<project>.supabase.co
//! SUPABASE_ANON_KEY=<anon key>
//! SUPABASE_SERVICE_ROLE_KEY=<service key>   # admin role updates
//! cargo run -- --port 3000
//! ```
//!
//! API documentation is served at `/docs` (Scalar) and
//! `/api-docs/openapi.json`.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use learnhub_auth;
pub use learnhub_config;
pub use learnhub_core;
pub use learnhub_models;
pub use learnhub_store;
