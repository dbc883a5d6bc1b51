//! HTTP endpoint handlers.
//!
//! Handlers coerce input, open a request-scoped connection, and delegate
//! to `crate::consultation`.

pub mod analyze;
pub mod health;
pub mod page;
pub mod roadmap;
pub mod visits;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
