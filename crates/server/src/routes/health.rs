//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Runs the commerce platform check. Returns 503 Service Unavailable while
/// the platform is unreachable or WooCommerce is inactive.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.ensure_platform_ready().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
