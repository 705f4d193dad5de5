//! HTTP route handlers for the status service.
//!
//! Both endpoints are computed per request and marked `no-store`. Unknown
//! paths get a JSON 404. Request tracing is enabled via middleware that
//! generates a unique request ID for each incoming request.

pub mod health;
pub mod status;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(status::index))
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    Router::new()
        .merge(api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
