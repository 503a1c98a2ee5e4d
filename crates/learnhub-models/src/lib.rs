//! # LearnHub Models
//!
//! Request and response DTOs for the LearnHub API.
//!
//! Rows owned by the data API travel through LearnHub untyped ([`Row`]);
//! only request bodies and the fields LearnHub writes itself are modelled
//! here, with `validator` rules and `utoipa` schemas.
//!
//! # Modules
//!
//! - [`auth`]: Sign-in, sign-up and session payloads
//! - [`users`]: Profile cache rows and role management
//! - [`classes`]: Class create/update bodies
//! - [`assignments`]: Assignment bodies
//! - [`submissions`]: Submission and grading bodies
//! - [`meetings`]: Meeting bodies
//!
//! # Example
//!
//! ```ignore
//! use learnhub_models::auth::SignUpRequest;
//! use validator::Validate;
//!
//! let request: SignUpRequest = serde_json::from_str(body)?;
//! request.validate()?;
//! let role = request.requested_role();
//! ```

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod meetings;
pub mod submissions;
pub mod users;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub use assignments::CreateAssignmentRequest;
pub use auth::{SessionResponse, SignInRequest, SignUpRequest};
pub use classes::{CreateClassRequest, UpdateClassRequest};
pub use meetings::CreateMeetingRequest;
pub use submissions::{GradeRequest, SubmitRequest};
pub use users::{Profile, UpdateRoleRequest, UserFilterParams};

/// A row forwarded from the data API as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Row(pub Value);
