//! HTTP layer.
//!
//! `api_router()` returns a `Router` serving the intake page at `/` and
//! the JSON API under `/api/`. `server` owns the listener lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
