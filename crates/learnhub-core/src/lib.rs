//! # LearnHub Core
//!
//! Foundational types shared by every LearnHub crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use learnhub_core::AppError;
//!
//! let error = AppError::forbidden("Teachers only".to_string());
//! assert_eq!(error.status, axum::http::StatusCode::FORBIDDEN);
//! ```

pub mod errors;

pub use errors::AppError;
