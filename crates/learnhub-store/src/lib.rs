//! # LearnHub Store
//!
//! Row storage for the LearnHub API. Rows live in the hosted Postgres
//! project and are reached through its PostgREST-compatible data API;
//! LearnHub forwards them as JSON objects without modelling the schema.
//!
//! - [`DataStore`]: The storage seam used by every service
//! - [`PostgrestStore`]: HTTP implementation against `/rest/v1`
//! - [`MemoryStore`]: In-process implementation for local runs and tests
//! - [`Query`]: Equality filters, ordering and limits
//!
//! Calls are made either on behalf of the signed-in user
//! ([`Caller::User`], so the project's row-level security applies) or with
//! the service key ([`Caller::Service`]) for writes LearnHub performs itself.

pub mod memory;
pub mod postgrest;
pub mod query;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use learnhub_core::AppError;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use query::{Order, Query};

/// Whose credentials a store call runs under.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Caller<'a> {
    User(&'a str),
    Service,
}

impl std::fmt::Debug for Caller<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Caller::User(_) => f.write_str("User(<redacted>)"),
            Caller::Service => f.write_str("Service"),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("refusing to {0} without a filter")]
    Unfiltered(&'static str),
    #[error("data store is not configured for {0}")]
    NotConfigured(&'static str),
    #[error("data store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("data store unreachable: {0}")]
    Transport(String),
    #[error("unexpected data store response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unfiltered(_) => AppError::internal(err),
            StoreError::NotConfigured(_) => AppError::service_unavailable(err.to_string()),
            StoreError::Rejected { status, .. } => match status {
                401 | 403 => AppError::forbidden(err.to_string()),
                404 => AppError::not_found(err),
                409 => AppError::conflict(err),
                _ => AppError::bad_request(err),
            },
            StoreError::Transport(_) | StoreError::Unexpected { .. } => AppError::bad_gateway(err),
        }
    }
}

/// Table-level row operations.
///
/// `update` and `delete` refuse unfiltered queries so a missing path
/// parameter can never touch a whole table.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn select(&self, table: &str, query: &Query, caller: Caller<'_>)
    -> StoreResult<Vec<Value>>;

    async fn insert(&self, table: &str, row: Value, caller: Caller<'_>) -> StoreResult<Value>;

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
        caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>>;

    async fn delete(&self, table: &str, query: &Query, caller: Caller<'_>)
    -> StoreResult<Vec<Value>>;
}
