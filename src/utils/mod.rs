//! Shared helpers for feature services.
//!
//! - [`auth_helpers`]: Ownership checks on forwarded rows
//! - [`html`]: Escaping for the page shells
//! - [`rows`]: Reading and stamping untyped data API rows

pub mod auth_helpers;
pub mod html;
pub mod rows;
