//! Application router.
//!
//! Layers (outermost → innermost):
//! 1. Request logger (all routes) → 2. `Cache-Control: no-store` (`/api` only)

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router.
///
/// Endpoint handlers use `State<ApiContext>`; `with_state` converts the
/// router to `Router<()>` before the logging layer is applied.
pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/roadmap", post(endpoints::roadmap::roadmap))
        .route("/patients/:id/visits", get(endpoints::visits::list))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(endpoints::page::index))
        .nest("/api", api)
        .fallback(endpoints::not_found)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
}
