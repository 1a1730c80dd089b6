//! HTTP route handlers for the feed server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - YML feed
//! GET  /yml                    - YML feed (alias)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (commerce platform reachable)
//! ```
//!
//! The feed accepts `all`, `categories`, and `exclude_categories` query
//! parameters; see [`crate::feed::filter`].

pub mod feed;
pub mod health;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware::from_fn,
    routing::get,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the feed routes router.
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(feed::show))
        .route("/yml", get(feed::show))
        // Feeds are rebuilt on every request
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Build the full application with its middleware stack.
///
/// Sentry layers are added by the binary, since they need an initialized
/// client to be useful.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(feed_routes())
        .merge(health_routes())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
